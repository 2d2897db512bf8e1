//! Pick subcommand: the full popup, background and content round trip.

use std::path::Path;
use std::time::Duration;

use tracing::info;

use stylescope_config::Config;
use stylescope_content::PickerEvent;
use stylescope_protocols::ColorFormat;

use crate::session::Session;

const PICK_TIMEOUT: Duration = Duration::from_secs(10);

/// Activate the picker, click the element with `target` as its id and
/// print what the popup received.
pub(crate) async fn pick(
    config: &Config,
    snapshot: &Path,
    target: &str,
    format: ColorFormat,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = Session::open(config, snapshot, false).await?;
    session.popup.set_color_format(format);

    if !session.popup.activate_picker().await {
        let message = session
            .popup
            .last_error()
            .unwrap_or("Failed to activate picker")
            .to_string();
        return Err(message.into());
    }

    let node = session
        .host
        .find_element(session.tab, target)
        .await?
        .ok_or_else(|| format!("No element with id \"{}\"", target))?;
    info!(element = target, node, "Clicking element");

    session
        .host
        .dispatch_dom_event(session.tab, PickerEvent::PointerOver { target: node })
        .await?;
    session
        .host
        .dispatch_dom_event(session.tab, PickerEvent::Click { target: node })
        .await?;
    session.wait_for_pick(PICK_TIMEOUT).await?;

    let element = session
        .popup
        .element()
        .ok_or("Picker ended without a selection")?;
    let box_model = element.box_model();
    let colors = element.colors();
    let typography = element.typography();

    println!("Element: {}", element.selector_label());
    println!("{}", "=".repeat(50));
    if !element.text_content.is_empty() {
        println!("Text:        {}", element.text_content);
    }
    println!("\nBox model");
    println!("  Width:       {}", box_model.width);
    println!("  Height:      {}", box_model.height);
    println!("  Margin:      {}", box_model.margin);
    println!("  Padding:     {}", box_model.padding);
    println!("\nColors");
    println!("  Background:  {}", format.render(&colors.background));
    println!("  Text:        {}", format.render(&colors.color));
    println!("\nTypography");
    println!("  Family:      {}", typography.font_family);
    println!("  Size:        {}", typography.font_size);
    println!("  Weight:      {}", typography.font_weight);
    println!("  Line height: {}", typography.line_height);
    Ok(())
}
