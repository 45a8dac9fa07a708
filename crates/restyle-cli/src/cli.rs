use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use restyle_core::Config;

#[derive(Parser, Debug)]
#[command(name = "restyle")]
#[command(about = "Migrate Aphrodite styles to CSS Modules and classnames")]
pub struct Cli {
    /// Log debug output (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rewrite source files in place and write their stylesheets
    Migrate {
        /// Files or directories to migrate
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Print the results instead of writing them
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        options: Options,
    },
    /// Print the stylesheet a file would produce
    Css {
        file: PathBuf,

        #[command(flatten)]
        options: Options,
    },
}

#[derive(Args, Debug, Default)]
pub struct Options {
    /// JSON file with configuration overrides
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, env = "CSS_FUNCTION_NAME")]
    pub helper_name: Option<String>,

    #[arg(long, env = "HELPER_MODULE")]
    pub helper_module: Option<String>,

    #[arg(long, env = "CLASS_NAMES_NAME")]
    pub composer_name: Option<String>,

    #[arg(long, env = "CLASS_NAMES_MODULE")]
    pub composer_module: Option<String>,

    #[arg(long, env = "CHECK_PRECEDENCE_COMMENT", allow_hyphen_values = true)]
    pub precedence_comment: Option<String>,

    #[arg(long, env = "ERROR_FILE_PATH")]
    pub error_log: Option<PathBuf>,

    #[arg(long, env = "CONTEXT_FILE_PATH")]
    pub context: Option<PathBuf>,
}

impl Options {
    /// Defaults, then the `--config` file, then flags and environment.
    pub fn resolve(&self) -> restyle_core::Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::load(path)?,
            None => Config::default(),
        };

        override_with(&mut config.helper_name, &self.helper_name);
        override_with(&mut config.helper_module, &self.helper_module);
        override_with(&mut config.composer_name, &self.composer_name);
        override_with(&mut config.composer_module, &self.composer_module);
        override_with(&mut config.precedence_comment, &self.precedence_comment);
        override_with(&mut config.error_log_path, &self.error_log);
        override_with(&mut config.context_path, &self.context);
        Ok(config)
    }
}

fn override_with<T: Clone>(field: &mut T, value: &Option<T>) {
    if let Some(value) = value {
        *field = value.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_defaults() {
        let options = Options {
            composer_name: Some("cx".to_string()),
            context: Some(PathBuf::from("theme/context.js")),
            ..Options::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.composer_name, "cx");
        assert_eq!(config.context_path, PathBuf::from("theme/context.js"));
        assert_eq!(config.helper_name, "css");
    }

    #[test]
    fn flags_override_the_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("restyle.json");
        std::fs::write(&path, r#"{ "composerName": "clsx", "composerModule": "clsx" }"#).unwrap();

        let options = Options {
            config: Some(path),
            composer_name: Some("cx".to_string()),
            ..Options::default()
        };
        let config = options.resolve().unwrap();
        assert_eq!(config.composer_name, "cx");
        assert_eq!(config.composer_module, "clsx");
    }

    #[test]
    fn parses_migrate_arguments() {
        let cli = Cli::try_parse_from(["restyle", "-v", "migrate", "--dry-run", "src", "lib/A.tsx"]).unwrap();
        assert!(cli.verbose);
        let Commands::Migrate { paths, dry_run, .. } = cli.command else {
            panic!("expected migrate");
        };
        assert!(dry_run);
        assert_eq!(paths, vec![PathBuf::from("src"), PathBuf::from("lib/A.tsx")]);
    }
}
