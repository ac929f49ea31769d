//! Categories command handler.

use modelfetch_core::Category;

/// Category names in display order, without the `none` placeholder.
pub fn category_names() -> Vec<&'static str> {
    Category::names()
        .into_iter()
        .filter(|name| *name != Category::None.as_ref())
        .collect()
}

/// Print every category folder name, one per line.
pub fn execute() {
    for name in category_names() {
        println!("{name}");
    }
}
