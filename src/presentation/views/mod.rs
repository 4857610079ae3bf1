mod results;

pub use results::{escape_html, render_results};
