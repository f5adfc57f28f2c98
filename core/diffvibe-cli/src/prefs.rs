//! `diffvibe theme` and `diffvibe syntax-theme`.

use diffvibe_core::{AppSession, Theme};

pub fn theme_get(session: &AppSession) {
    println!("{}", session.theme.value());
}

pub fn theme_set(session: &mut AppSession, theme: Theme) {
    session.theme.set(theme);
    println!("{}", theme);
}

pub fn theme_toggle(session: &mut AppSession) {
    let theme = session.theme.toggle();
    println!("{}", theme);
}

pub fn syntax_theme_get(session: &AppSession) {
    println!("{}", session.syntax_theme.value());
}

pub fn syntax_theme_set(session: &mut AppSession, name: &str) {
    session.syntax_theme.set(name);
    println!("{}", name);
}
