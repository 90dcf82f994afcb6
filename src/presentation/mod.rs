pub mod cli;
pub mod settings_form;
