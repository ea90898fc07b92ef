use console::Style;
use once_cell::sync::Lazy;

pub struct Styles {
    pub label: Style,
    pub value: Style,
    pub hidden: Style,
    pub attached: Style,
    pub detached: Style,
    pub error: Style,
    pub default_marker: Style,
}

pub static STYLES: Lazy<Styles> = Lazy::new(|| Styles {
    label: Style::new().bold(),
    value: Style::new(),
    hidden: Style::new().color256(245).italic(),
    attached: Style::new().green(),
    detached: Style::new().yellow(),
    error: Style::new().red().bold(),
    default_marker: Style::new().cyan(),
});
