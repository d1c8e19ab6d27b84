use gtk::gdk;
use gtk4 as gtk;

pub fn load_css() {
    let provider = gtk::CssProvider::new();
    let css_data = "
.spinwheel-drawing-area {
    background: none;
    background-color: transparent;
}

.spinwheel-outcome {
    font-size: 1.3em;
    font-weight: bold;
}

.spinwheel-spin-button {
    min-width: 8em;
    font-weight: bold;
}
";
    provider.load_from_data(css_data);

    if let Some(display) = gdk::Display::default() {
        gtk::style_context_add_provider_for_display(
            &display,
            &provider,
            gtk::STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}
