pub mod icons;
pub mod output;
pub mod table;
pub mod theme;

pub use icons::Icons;
pub use output::Printer;
pub use table::contacts_table;
pub use theme::Theme;
