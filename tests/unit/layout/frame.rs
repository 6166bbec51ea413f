use super::*;

#[test]
fn defaults_fill_the_screen_from_the_center() {
    let f = FrameState::default();
    assert_eq!(f.h_position_type, PositionType::Center);
    assert_eq!(f.v_position_type, PositionType::Center);
    assert_eq!(f.width, 100.0);
    assert_eq!(f.width_units, WidthUnits::PercentParentWidth);
    assert_eq!(f.height_units, HeightUnits::PercentParentHeight);
    assert_eq!(f.matte_color, Rgba::CLEAR);
    assert_eq!(f.border_color, Rgba::BLACK);
}

#[test]
fn json_overrides_only_named_fields() {
    let f: FrameState =
        serde_json::from_str(r#"{"h_position_type":"Edge","left":25,"left_units":"Percent"}"#)
            .unwrap();
    assert_eq!(f.h_position_type, PositionType::Edge);
    assert_eq!(f.left, 25.0);
    assert_eq!(f.left_units, PositionUnits::Percent);
    assert_eq!(f.height, 100.0);
}

#[test]
fn horizontal_position_resets_previous_values() {
    let mut f = FrameState::default();
    f.h = 40.0;
    f.right = 12.0;
    f.set_horizontal_position(
        "25%",
        PositionType::Edge,
        PositionEdgeHorz::Left,
        PositionAlignHorz::Left,
    )
    .unwrap();
    assert_eq!((f.h, f.left, f.right), (0.0, 25.0, 0.0));
    assert_eq!(f.left_units, PositionUnits::Percent);
    assert_eq!(f.h_align, PositionAlignHorz::Left);
}

#[test]
fn vertical_center_takes_pixel_offsets() {
    let mut f = FrameState::default();
    f.set_vertical_position(
        "-30",
        PositionType::Center,
        PositionEdgeVert::Bottom,
        PositionAlignVert::Bottom,
    )
    .unwrap();
    assert_eq!(f.v, -30.0);
    assert_eq!(f.v_units, PositionUnits::Pixels);
    assert_eq!(f.v_edge, PositionEdgeVert::Bottom);
}

#[test]
fn move_to_offscreen_destinations_add_a_full_screen() {
    let mut f = FrameState::default();
    f.move_to(PanelPosition::OffscreenRight, "5%").unwrap();
    assert_eq!(f.h_position_type, PositionType::Edge);
    assert_eq!(f.h_edge, PositionEdgeHorz::Left);
    assert_eq!(f.left, 105.0);

    f.move_to(PanelPosition::OffscreenTop, "0%").unwrap();
    assert_eq!(f.v_edge, PositionEdgeVert::Bottom);
    assert_eq!(f.bottom, 100.0);
    assert_eq!(f.bottom_units, PositionUnits::Percent);
}

#[test]
fn move_to_center_uses_both_offsets() {
    let mut f = FrameState::default();
    f.move_to(PanelPosition::Center, "10,-20%").unwrap();
    assert_eq!((f.h, f.h_units), (10.0, PositionUnits::Pixels));
    assert_eq!((f.v, f.v_units), (-20.0, PositionUnits::Percent));
}

#[test]
fn size_suffixes_select_units() {
    let mut f = FrameState::default();
    f.set_size("1.5AR", "300", "", "2.5").unwrap();
    assert_eq!((f.width, f.width_units), (1.5, WidthUnits::PercentPanelHeight));
    assert_eq!((f.height, f.height_units), (300.0, HeightUnits::Pixels));
    assert_eq!(f.min_aspect_ratio, 0.0);
    assert_eq!(f.max_aspect_ratio, 2.5);

    f.set_height("0.75AR").unwrap();
    assert_eq!(f.height_units, HeightUnits::PercentPanelWidth);
    f.set_width("80%").unwrap();
    assert_eq!((f.width, f.width_units), (80.0, WidthUnits::PercentParentWidth));
}

#[test]
fn malformed_numbers_are_validation_errors() {
    let mut f = FrameState::default();
    let err = f.set_size("wide", "10", "", "").unwrap_err();
    assert!(matches!(err, PanoplyError::Validation(_)));
    assert!(f.move_to(PanelPosition::Left, "abc%").is_err());
    assert!("Sideways".parse::<PanelPosition>().is_err());
    assert_eq!("OffscreenLeft".parse::<PanelPosition>().unwrap(), PanelPosition::OffscreenLeft);
}

#[test]
fn margins_helpers() {
    let mut f = FrameState::default();
    f.set_all_margins(4.0);
    assert_eq!(f.margins, Edges::uniform(4.0));
    f.set_margins(1.0, 2.0, 3.0, 4.0);
    assert_eq!(f.margins.right, 2.0);
    assert_eq!(f.margins.left, 4.0);
}
