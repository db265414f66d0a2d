//! Resolution of the process to spawn for a stdio provider
//!
//! A provider command may point straight at a script. Scripts are not
//! executed directly; the interpreter is chosen from the file extension and
//! the script path becomes its first argument:
//!
//! | extension          | Unix                | Windows              |
//! |--------------------|---------------------|----------------------|
//! | `.py`              | `python3 <script>`  | `python <script>`    |
//! | `.js` `.mjs` `.cjs`| `node <script>`     | `node <script>`      |
//! | `.ts`              | `npx tsx <script>`  | `npx tsx <script>`   |
//! | `.sh`              | `sh <script>`       | `sh <script>`        |
//! | `.ps1`             | `pwsh -File <script>` | `powershell -File <script>` |
//!
//! Extensions are matched case-insensitively. Any other command is spawned
//! as-is. Configured arguments always follow the script path.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::config::StdioProviderConfig;

/// Operating-system family, for interpreter naming
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Unix,
    Windows,
}

impl Platform {
    pub fn current() -> Self {
        if cfg!(windows) {
            Platform::Windows
        } else {
            Platform::Unix
        }
    }
}

/// Fully resolved process launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaunchSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub env: BTreeMap<String, String>,
}

impl LaunchSpec {
    /// Resolve for the platform we are running on
    pub fn resolve(config: &StdioProviderConfig) -> Self {
        Self::resolve_for(config, Platform::current())
    }

    /// Resolve for an explicit platform
    pub fn resolve_for(config: &StdioProviderConfig, platform: Platform) -> Self {
        let (program, mut args) = match interpreter_for(&config.command, platform) {
            Some((interpreter, leading)) => {
                let mut args: Vec<String> = leading.iter().map(|s| s.to_string()).collect();
                args.push(config.command.clone());
                (interpreter.to_string(), args)
            }
            None => (config.command.clone(), Vec::new()),
        };
        args.extend(config.args.iter().cloned());

        Self {
            program,
            args,
            cwd: config.cwd.clone(),
            env: config.env.clone(),
        }
    }

    /// True when an interpreter was prepended
    pub fn is_interpreted(&self, config: &StdioProviderConfig) -> bool {
        self.program != config.command
    }

    /// Build the command to spawn
    pub fn to_command(&self) -> tokio::process::Command {
        let mut cmd = tokio::process::Command::new(&self.program);
        cmd.args(&self.args);
        if let Some(cwd) = &self.cwd {
            cmd.current_dir(cwd);
        }
        cmd.envs(&self.env);
        cmd.kill_on_drop(true);
        cmd
    }
}

impl std::fmt::Display for LaunchSpec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

const NO_ARGS: &[&str] = &[];
const TSX_ARGS: &[&str] = &["tsx"];
const PS_FILE_ARGS: &[&str] = &["-File"];

/// Interpreter plus arguments that precede the script path
fn interpreter_for(command: &str, platform: Platform) -> Option<(&'static str, &'static [&'static str])> {
    let ext = Path::new(command).extension()?.to_str()?.to_ascii_lowercase();
    let windows = platform == Platform::Windows;
    let resolved = match ext.as_str() {
        "py" if windows => ("python", NO_ARGS),
        "py" => ("python3", NO_ARGS),
        "js" | "mjs" | "cjs" => ("node", NO_ARGS),
        "ts" => ("npx", TSX_ARGS),
        "sh" => ("sh", NO_ARGS),
        "ps1" if windows => ("powershell", PS_FILE_ARGS),
        "ps1" => ("pwsh", PS_FILE_ARGS),
        _ => return None,
    };
    Some(resolved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProviderConfig;

    fn stdio(command: &str, args: &[&str]) -> StdioProviderConfig {
        match ProviderConfig::stdio("p", "P", command).with_args(args.iter().copied()) {
            ProviderConfig::Stdio(c) => c,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_python_script() {
        let config = stdio("servers/fs.py", &["--root", "/tmp"]);

        let unix = LaunchSpec::resolve_for(&config, Platform::Unix);
        assert_eq!(unix.program, "python3");
        assert_eq!(unix.args, vec!["servers/fs.py", "--root", "/tmp"]);
        assert!(unix.is_interpreted(&config));

        let windows = LaunchSpec::resolve_for(&config, Platform::Windows);
        assert_eq!(windows.program, "python");
    }

    #[test]
    fn test_node_and_typescript_scripts() {
        let js = LaunchSpec::resolve_for(&stdio("server.MJS", &[]), Platform::Unix);
        assert_eq!(js.program, "node");
        assert_eq!(js.args, vec!["server.MJS"]);

        let ts = LaunchSpec::resolve_for(&stdio("server.ts", &["-v"]), Platform::Unix);
        assert_eq!(ts.program, "npx");
        assert_eq!(ts.args, vec!["tsx", "server.ts", "-v"]);
    }

    #[test]
    fn test_powershell_script() {
        let spec = LaunchSpec::resolve_for(&stdio("run.ps1", &[]), Platform::Windows);
        assert_eq!(spec.program, "powershell");
        assert_eq!(spec.args, vec!["-File", "run.ps1"]);
    }

    #[test]
    fn test_plain_executable_untouched() {
        let config = stdio("uvx", &["mcp-server-git"]);
        let spec = LaunchSpec::resolve_for(&config, Platform::Unix);
        assert_eq!(spec.program, "uvx");
        assert_eq!(spec.args, vec!["mcp-server-git"]);
        assert!(!spec.is_interpreted(&config));
        assert_eq!(spec.to_string(), "uvx mcp-server-git");
    }

    #[test]
    fn test_cwd_and_env_carried() {
        let mut config = stdio("server", &[]);
        config.cwd = Some(PathBuf::from("/srv"));
        config.env.insert("TOKEN".into(), "x".into());

        let spec = LaunchSpec::resolve(&config);
        assert_eq!(spec.cwd, Some(PathBuf::from("/srv")));
        assert_eq!(spec.env.get("TOKEN").map(String::as_str), Some("x"));
    }
}
