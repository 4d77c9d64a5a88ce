pub mod html_rows;
pub mod quiver;
