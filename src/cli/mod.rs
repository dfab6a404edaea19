mod menu;
mod wizard;

pub use menu::run_menu;
