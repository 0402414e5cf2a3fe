use anyhow::Result;
use geoview_core::presets::OutlookPreset;

/// Run the `presets` command
pub fn run_presets() -> Result<()> {
    for preset in OutlookPreset::all() {
        println!("{:<10} {:<26} {}", preset.name(), preset.label(), preset.url());
    }
    Ok(())
}
