pub mod chart_panel;
pub mod point_modal;
pub mod points_table;
