fn main() -> anyhow::Result<()> {
    // Chip cfgs (`esp32c3`, `esp_idf_version_major`, ...) and link args only
    // exist when esp-idf-sys is part of the build.
    if std::env::var("CARGO_CFG_TARGET_OS").as_deref() == Ok("espidf") {
        embuild::build::CfgArgs::output_propagated("ESP_IDF")?;
        embuild::build::LinkArgs::output_propagated("ESP_IDF")?;
    }

    Ok(())
}
