pub mod line_id;
