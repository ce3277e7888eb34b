use parejas_core::{KeyValueStore, Settings, Theme};

pub(crate) const ATTR_NAME: &str = "data-theme";

/// Applies the stored theme before the first render.
pub(crate) fn init(store: &impl KeyValueStore) {
    apply(Settings::load(store).theme);
}

pub(crate) fn apply(theme: Theme) {
    use gloo::utils::document;

    let Some(html) = document().document_element() else {
        log::error!("no document element to theme");
        return;
    };
    log::debug!("theme: {}", theme.display_name());
    if let Err(err) = html.set_attribute(ATTR_NAME, theme.key()) {
        log::error!("failed to set theme: {:?}", err);
    }
}
