//! Argument vectors for the `op` subcommands the client uses.
//!
//! The order of flags mirrors what `op` documents and what the client's callers
//! assert on; keep it stable.

/// Default executable name, resolved through `PATH`.
pub const DEFAULT_PROGRAM: &str = "op";

/// Builds `op` invocations. Holds only the program name or path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpCommand {
    program: String,
}

impl Default for OpCommand {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl OpCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn version_args(&self) -> Vec<String> {
        vec!["--version".to_string()]
    }

    pub fn vault_list_args(&self) -> Vec<String> {
        to_owned(&["vault", "list", "--format", "json"])
    }

    /// `item get <item> --format json --vault <vault> [--fields label=a,label=b]`
    pub fn item_get_args<S: AsRef<str>>(
        &self,
        item: &str,
        vault: &str,
        fields: &[S],
    ) -> Vec<String> {
        let mut args = to_owned(&["item", "get", item, "--format", "json", "--vault", vault]);
        if !fields.is_empty() {
            let labels: Vec<String> = fields
                .iter()
                .map(|f| format!("label={}", f.as_ref()))
                .collect();
            args.push("--fields".to_string());
            args.push(labels.join(","));
        }
        args
    }

    pub fn document_get_args(&self, item: &str, vault: &str) -> Vec<String> {
        to_owned(&["document", "get", item, "--vault", vault])
    }

    /// `items list --vault <vault> --format json [--categories a,b] [--tags x,y]`
    pub fn item_list_args<S: AsRef<str>>(
        &self,
        vault: &str,
        categories: &[S],
        tags: &[S],
    ) -> Vec<String> {
        let mut args = to_owned(&["items", "list", "--vault", vault, "--format", "json"]);
        if !categories.is_empty() {
            args.push("--categories".to_string());
            args.push(join(categories));
        }
        if !tags.is_empty() {
            args.push("--tags".to_string());
            args.push(join(tags));
        }
        args
    }
}

fn to_owned(args: &[&str]) -> Vec<String> {
    args.iter().map(|a| a.to_string()).collect()
}

fn join<S: AsRef<str>>(values: &[S]) -> String {
    values
        .iter()
        .map(|v| v.as_ref())
        .collect::<Vec<_>>()
        .join(",")
}
