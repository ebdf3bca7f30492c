mod input;
mod key_result;
mod product_form;
mod product_grid;

pub use key_result::KeyResult;
pub use product_form::{FormEvent, FormMode, ProductForm};
pub use product_grid::{columns_for_width, render_grid, GridState};
