// Copyright 2025 the Canopy Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Spacing and sizing constants consumed by the layout engine.

use kurbo::Vec2;

/// Layout constants, fixed for the lifetime of a [`LayoutEngine`](crate::LayoutEngine).
///
/// All distances are in logical pixels. The defaults give a compact map at a 12pt default
/// font; hosts can start from [`LayoutSettings::default`] and override single fields.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct LayoutSettings {
    /// Horizontal gap between a cell's edge and its children's family boxes.
    pub internode_horizontal_distance: f64,
    /// Vertical gap between stacked sibling family boxes.
    pub internode_vertical_distance: f64,
    /// First connector control point, relative to the start anchor.
    ///
    /// The x component is negated for left-side edges.
    pub bezier_control_point_1: Vec2,
    /// Second connector control point, relative to the end anchor.
    ///
    /// The x component is negated for left-side edges.
    pub bezier_control_point_2: Vec2,
    /// Wrap width for the text of non-root cells.
    pub max_text_node_width: f64,
    /// Wrap width for the text of the root cell.
    pub max_root_cell_text_width: f64,
    /// Lower bound of the text block width, so empty cells stay hittable.
    pub node_min_width: f64,
    /// Lower bound of the text block height.
    pub node_min_height: f64,
    /// Edge length of a drawn icon.
    pub icon_draw_size: f64,
    /// Gap between two icons.
    pub inter_icon_distance: f64,
    /// Gap between the icon strip and the text block.
    pub icon_text_distance: f64,
    /// Padding left and right of the content.
    pub cell_horizontal_padding: f64,
    /// Padding above and below the content.
    pub cell_vertical_padding: f64,
    /// Fraction of a cell's width (height) covered by each east/west (north/south) drag band.
    pub drag_region_fraction: f64,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            internode_horizontal_distance: 30.0,
            internode_vertical_distance: 10.0,
            bezier_control_point_1: Vec2::new(15.0, 0.0),
            bezier_control_point_2: Vec2::new(-15.0, 0.0),
            max_text_node_width: 200.0,
            max_root_cell_text_width: 300.0,
            node_min_width: 30.0,
            node_min_height: 14.0,
            icon_draw_size: 16.0,
            inter_icon_distance: 4.0,
            icon_text_distance: 4.0,
            cell_horizontal_padding: 4.0,
            cell_vertical_padding: 2.0,
            drag_region_fraction: 1.0 / 3.0,
        }
    }
}
