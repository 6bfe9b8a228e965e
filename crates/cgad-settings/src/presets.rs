/// Namespaces grouped by default when no config says otherwise.
pub const DEFAULT_PREFIXES: [&str; 5] = ["tests", "plan", "cpsc", "command", "ddf"];

pub fn default_prefixes() -> Vec<String> {
    DEFAULT_PREFIXES.iter().map(|p| p.to_string()).collect()
}
