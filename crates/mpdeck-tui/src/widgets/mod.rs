pub mod border;
pub mod dialogue;
pub mod fit;
pub mod notice;
pub mod progress_bar;
pub mod selection;
pub mod text_field;
