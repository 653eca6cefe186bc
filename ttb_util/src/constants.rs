#[macro_export]
macro_rules! ttb_config_file_name_macro {
    () => {
        "ttb.toml"
    };
}

pub const TTB_TOOL_NAME: &str = "ttb";
pub const TTB_CONFIG_FILE_NAME: &str = ttb_config_file_name_macro!();
pub const TTB_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Prefix used when naming constant nodes, followed by the constant id and its bits.
pub const TTB_CONST_NAME_PREFIX: &str = "const";
