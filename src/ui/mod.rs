/// Console layer: prompts, menus, the inspector and plot templates.
pub mod inspect;
pub mod menus;
pub mod plot;
pub mod prompt;
pub mod templates;
