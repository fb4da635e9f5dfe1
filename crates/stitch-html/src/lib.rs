//! HTML rendering of stitch navigation menus.
//!
//! [`NavigationHtmlWriter`] turns a subtree of a [`stitch_nav::NavigationTree`]
//! into a nested list and caches the result, since every page of a set
//! shares the same menu.

mod writer;

pub use writer::NavigationHtmlWriter;

#[cfg(test)]
mod tests {
    use super::*;

    static_assertions::assert_impl_all!(NavigationHtmlWriter: Send, Sync);
}
