//! Formatter descriptors.
//!
//! Each supported external tool is one variant of [`Formatter`]. A variant
//! knows which file extensions it handles, which file names it treats as its
//! own configuration, how to decide whether it is usable, and how to build
//! and run its command line. Adding a tool means adding a variant.

use crate::error::{PolyfmtError, Result};
use crate::project::ProjectConfig;
use crate::settings::GlobalSettings;
use crate::tools::process::{Invocation, ProcessRunner};
use regex::{Regex, RegexBuilder};
use std::fmt;
use std::path::Path;
use std::str::FromStr;
use std::sync::LazyLock;

/// Program used to run tools that are resolved through `PATH`.
pub const ENV_PROGRAM: &str = "/usr/bin/env";

/// Style handed to clang-format when no style is configured anywhere.
pub const DEFAULT_CLANG_FORMAT_STYLE: &str = "LLVM";

static SWIFTFORMAT_CONFIG: LazyLock<Regex> = LazyLock::new(|| config_pattern(r"^\.swiftformat$"));
static APPLE_SWIFT_FORMAT_CONFIG: LazyLock<Regex> =
    LazyLock::new(|| config_pattern(r"^\.swift-format$"));
static CLANG_FORMAT_CONFIG: LazyLock<Regex> = LazyLock::new(|| config_pattern(r"^\.clang-format$"));
static PRETTIER_CONFIG: LazyLock<Regex> = LazyLock::new(|| config_pattern(r"^\.prettierrc(\..*)?$"));

fn config_pattern(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .unwrap()
}

const SWIFT_EXTENSIONS: &[&str] = &["swift"];

const CLANG_FORMAT_EXTENSIONS: &[&str] = &[
    "c", "cpp", "cc", "cp", "c++", "cxx", "m", "mm", "java", "jav", "h", "pch", "pch++", "hh",
    "hpp", "h++", "hxx", "hp", "json", "cs", "proto",
];

const PRETTIER_EXTENSIONS: &[&str] = &[
    "js", "jsx", "ts", "tsx", "css", "less", "scss", "html", "htm", "json", "md", "graphql",
    "gql", "yaml", "yml", "xml",
];

/// An external formatting tool.
///
/// [`Formatter::ALL`] lists the variants in selection precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Formatter {
    /// Nick Lockwood's SwiftFormat (`swiftformat`).
    SwiftFormat,

    /// Apple's swift-format (`swift-format`).
    AppleSwiftFormat,

    /// LLVM's clang-format.
    ClangFormat,

    /// Prettier, optionally run from the project's node modules via npx.
    Prettier,
}

/// Everything a formatter needs to format one file copy.
#[derive(Debug, Clone, Copy)]
pub struct FormatTarget<'a> {
    /// The temporary copy that is formatted in place.
    pub file: &'a Path,

    /// Working directory for the tool (the resolution's search root).
    pub working_dir: Option<&'a Path>,

    /// The tool's own configuration file, when one was discovered.
    pub config_file: Option<&'a Path>,

    /// The project override config, when one was found and parsed.
    pub project: Option<&'a ProjectConfig>,

    /// Global settings for this request.
    pub settings: &'a GlobalSettings,
}

impl Formatter {
    /// All formatters in selection precedence order.
    pub const ALL: [Formatter; 4] = [
        Formatter::SwiftFormat,
        Formatter::AppleSwiftFormat,
        Formatter::ClangFormat,
        Formatter::Prettier,
    ];

    /// Stable tool identifier, also used as the settings table name.
    pub fn id(self) -> &'static str {
        match self {
            Formatter::SwiftFormat => "swiftformat",
            Formatter::AppleSwiftFormat => "swift-format",
            Formatter::ClangFormat => "clang-format",
            Formatter::Prettier => "prettier",
        }
    }

    /// Human-readable tool name used in messages.
    pub fn display_name(self) -> &'static str {
        match self {
            Formatter::SwiftFormat => "SwiftFormat",
            Formatter::AppleSwiftFormat => "swift-format",
            Formatter::ClangFormat => "ClangFormat",
            Formatter::Prettier => "Prettier",
        }
    }

    /// File extensions this formatter can process.
    pub fn supported_extensions(self) -> &'static [&'static str] {
        match self {
            Formatter::SwiftFormat | Formatter::AppleSwiftFormat => SWIFT_EXTENSIONS,
            Formatter::ClangFormat => CLANG_FORMAT_EXTENSIONS,
            Formatter::Prettier => PRETTIER_EXTENSIONS,
        }
    }

    /// Returns `true` if `extension` (without the dot) is supported.
    pub fn supports_extension(self, extension: &str) -> bool {
        self.supported_extensions()
            .iter()
            .any(|e| e.eq_ignore_ascii_case(extension))
    }

    /// Returns `true` if `file_name` is one of this tool's config files.
    pub fn matches_config_file(self, file_name: &str) -> bool {
        let pattern = match self {
            Formatter::SwiftFormat => &SWIFTFORMAT_CONFIG,
            Formatter::AppleSwiftFormat => &APPLE_SWIFT_FORMAT_CONFIG,
            Formatter::ClangFormat => &CLANG_FORMAT_CONFIG,
            Formatter::Prettier => &PRETTIER_CONFIG,
        };
        pattern.is_match(file_name)
    }

    /// Executable path from the project override, falling back to settings.
    pub fn executable_path<'a>(
        self,
        settings: &'a GlobalSettings,
        project: Option<&'a ProjectConfig>,
    ) -> Option<&'a str> {
        project
            .and_then(|p| p.executable_path(self))
            .or_else(|| settings.executable_path(self))
    }

    /// Returns `true` if Prettier should run from the project's node modules.
    fn uses_node_modules(self, project: Option<&ProjectConfig>) -> bool {
        self == Formatter::Prettier
            && project.is_some_and(ProjectConfig::use_prettier_from_node_modules)
    }

    /// Returns `true` if an executable can be resolved for this formatter.
    ///
    /// In Prettier's node-modules mode usability depends on the npx path
    /// instead of the Prettier path.
    pub fn is_usable(self, settings: &GlobalSettings, project: Option<&ProjectConfig>) -> bool {
        if self.uses_node_modules(project) {
            return settings.npx_executable_path().is_some();
        }
        self.executable_path(settings, project).is_some()
    }

    /// Builds the command line that formats `target.file` in place.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::ExecutablePathNotSet` if no executable is
    /// configured for this formatter (or for npx in node-modules mode).
    pub fn invocation(self, target: &FormatTarget<'_>) -> Result<Invocation> {
        let settings = target.settings;
        let project = target.project;
        let not_set = |name: &str| PolyfmtError::ExecutablePathNotSet(name.to_string());

        let invocation = match self {
            Formatter::SwiftFormat => {
                let exe = self
                    .executable_path(settings, project)
                    .ok_or_else(|| not_set(self.display_name()))?;
                Invocation::new(exe, target.file).target_arg()
            }
            Formatter::AppleSwiftFormat => {
                let exe = self
                    .executable_path(settings, project)
                    .ok_or_else(|| not_set(self.display_name()))?;
                Invocation::new(exe, target.file).arg("-i").target_arg()
            }
            Formatter::ClangFormat => {
                let exe = self
                    .executable_path(settings, project)
                    .ok_or_else(|| not_set(self.display_name()))?;
                let style = if target.config_file.is_some() {
                    "file"
                } else {
                    project
                        .and_then(|p| p.style(self))
                        .or_else(|| settings.style(self))
                        .unwrap_or(DEFAULT_CLANG_FORMAT_STYLE)
                };
                Invocation::new(exe, target.file)
                    .arg(format!("-style={style}"))
                    .arg("-i")
                    .target_arg()
            }
            Formatter::Prettier => {
                let arguments = project
                    .and_then(|p| p.arguments(self))
                    .or_else(|| settings.arguments(self))
                    .unwrap_or_default();
                if self.uses_node_modules(project) {
                    let npx = settings.npx_executable_path().ok_or_else(|| not_set("NPX"))?;
                    Invocation::new(ENV_PROGRAM, target.file)
                        .arg(npx)
                        .arg("prettier")
                        .target_arg()
                        .arg("--write")
                        .args(arguments.split_whitespace())
                } else {
                    let exe = self
                        .executable_path(settings, project)
                        .ok_or_else(|| not_set(self.display_name()))?;
                    Invocation::new(ENV_PROGRAM, target.file)
                        .arg(exe)
                        .arg("--write")
                        .target_arg()
                        .args(arguments.split_whitespace())
                }
            }
        };

        Ok(invocation
            .current_dir(target.working_dir)
            .search_path(settings.search_path()))
    }

    /// Runs the formatter against `target.file` and waits for it to exit.
    ///
    /// On success the formatted text is whatever the tool left in the file;
    /// the process's stdout is not used.
    ///
    /// # Errors
    ///
    /// Returns `PolyfmtError::ExternalToolFailure` with the tool's trimmed
    /// combined output if it exits non-zero, or any error from building or
    /// spawning the invocation.
    #[tracing::instrument(level = "debug", skip_all, fields(formatter = self.id()))]
    pub fn format(self, runner: &dyn ProcessRunner, target: &FormatTarget<'_>) -> Result<()> {
        let invocation = self.invocation(target)?;
        let output = runner.run(&invocation)?;

        if !output.success() {
            tracing::debug!(exit_code = output.exit_code, "formatter exited with failure");
            return Err(PolyfmtError::ExternalToolFailure(
                output.combined().trim().to_string(),
            ));
        }

        Ok(())
    }
}

impl fmt::Display for Formatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Formatter {
    type Err = PolyfmtError;

    fn from_str(s: &str) -> Result<Self> {
        Formatter::ALL
            .into_iter()
            .find(|f| f.id() == s)
            .ok_or_else(|| PolyfmtError::InvalidConfig(format!("unknown formatter: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::process::CommandOutput;
    use crate::tools::process_mock::MockProcessRunner;
    use std::path::PathBuf;

    fn settings_with(formatter: Formatter, path: &str) -> GlobalSettings {
        let mut settings = GlobalSettings::default();
        settings
            .set(&format!("{}.executable_path", formatter.id()), path)
            .unwrap();
        settings
    }

    fn target<'a>(
        settings: &'a GlobalSettings,
        project: Option<&'a ProjectConfig>,
        config_file: Option<&'a Path>,
    ) -> FormatTarget<'a> {
        FormatTarget {
            file: Path::new("/repo/.polyfmt_tmp.c"),
            working_dir: Some(Path::new("/repo")),
            config_file,
            project,
            settings,
        }
    }

    #[test]
    fn test_config_file_patterns() {
        assert!(Formatter::SwiftFormat.matches_config_file(".swiftformat"));
        assert!(Formatter::SwiftFormat.matches_config_file(".SwiftFormat"));
        assert!(!Formatter::SwiftFormat.matches_config_file(".swift-format"));
        assert!(Formatter::AppleSwiftFormat.matches_config_file(".swift-format"));
        assert!(Formatter::ClangFormat.matches_config_file(".clang-format"));
        assert!(!Formatter::ClangFormat.matches_config_file(".clang-format.bak"));
        assert!(Formatter::Prettier.matches_config_file(".prettierrc"));
        assert!(Formatter::Prettier.matches_config_file(".prettierrc.json"));
        assert!(Formatter::Prettier.matches_config_file(".prettierrc.yaml"));
        assert!(!Formatter::Prettier.matches_config_file("prettierrc"));
    }

    #[test]
    fn test_supported_extensions() {
        assert!(Formatter::SwiftFormat.supports_extension("swift"));
        assert!(Formatter::ClangFormat.supports_extension("json"));
        assert!(Formatter::Prettier.supports_extension("json"));
        assert!(Formatter::ClangFormat.supports_extension("H++"));
        assert!(!Formatter::Prettier.supports_extension("swift"));
    }

    #[test]
    fn test_is_usable_prefers_project_path() {
        let settings = GlobalSettings::default();
        let project = ProjectConfig {
            clang_format_executable_path: Some("/opt/clang-format".to_string()),
            ..Default::default()
        };

        assert!(!Formatter::ClangFormat.is_usable(&settings, None));
        assert!(Formatter::ClangFormat.is_usable(&settings, Some(&project)));
        assert_eq!(
            Formatter::ClangFormat.executable_path(&settings, Some(&project)),
            Some("/opt/clang-format")
        );
    }

    #[test]
    fn test_prettier_node_modules_usability() {
        let settings = settings_with(Formatter::Prettier, "/usr/local/bin/prettier");
        let project = ProjectConfig {
            use_prettier_from_node_modules: Some(true),
            ..Default::default()
        };

        assert!(Formatter::Prettier.is_usable(&settings, None));
        assert!(!Formatter::Prettier.is_usable(&settings, Some(&project)));

        let mut settings = settings;
        settings.set("npx.executable_path", "/usr/local/bin/npx").unwrap();
        assert!(Formatter::Prettier.is_usable(&settings, Some(&project)));
    }

    #[test]
    fn test_clang_format_style_resolution() {
        let mut settings = settings_with(Formatter::ClangFormat, "/usr/bin/clang-format");
        let invocation = Formatter::ClangFormat
            .invocation(&target(&settings, None, None))
            .unwrap();
        assert_eq!(invocation.args[0], "-style=LLVM");

        settings.set("clang-format.style", "Google").unwrap();
        let invocation = Formatter::ClangFormat
            .invocation(&target(&settings, None, None))
            .unwrap();
        assert_eq!(invocation.args[0], "-style=Google");

        let project = ProjectConfig {
            clang_format_style: Some("WebKit".to_string()),
            ..Default::default()
        };
        let invocation = Formatter::ClangFormat
            .invocation(&target(&settings, Some(&project), None))
            .unwrap();
        assert_eq!(invocation.args[0], "-style=WebKit");

        let config = PathBuf::from("/repo/.clang-format");
        let invocation = Formatter::ClangFormat
            .invocation(&target(&settings, Some(&project), Some(config.as_path())))
            .unwrap();
        assert_eq!(
            invocation.args,
            vec!["-style=file", "-i", "/repo/.polyfmt_tmp.c"]
        );
        assert_eq!(invocation.current_dir, Some(PathBuf::from("/repo")));
        assert_eq!(invocation.search_path, settings.search_path());
    }

    #[test]
    fn test_swift_invocations() {
        let settings = settings_with(Formatter::SwiftFormat, "/usr/local/bin/swiftformat");
        let invocation = Formatter::SwiftFormat
            .invocation(&target(&settings, None, None))
            .unwrap();
        assert_eq!(invocation.program, "/usr/local/bin/swiftformat");
        assert_eq!(invocation.args, vec!["/repo/.polyfmt_tmp.c"]);

        let settings = settings_with(Formatter::AppleSwiftFormat, "/usr/bin/swift-format");
        let invocation = Formatter::AppleSwiftFormat
            .invocation(&target(&settings, None, None))
            .unwrap();
        assert_eq!(invocation.args, vec!["-i", "/repo/.polyfmt_tmp.c"]);
    }

    #[test]
    fn test_prettier_invocations() {
        let mut settings = settings_with(Formatter::Prettier, "/usr/local/bin/prettier");
        let invocation = Formatter::Prettier
            .invocation(&target(&settings, None, None))
            .unwrap();
        assert_eq!(invocation.program, ENV_PROGRAM);
        assert_eq!(
            invocation.args,
            vec!["/usr/local/bin/prettier", "--write", "/repo/.polyfmt_tmp.c"]
        );

        settings.set("prettier.arguments", "--single-quote --tab-width 4").unwrap();
        let invocation = Formatter::Prettier
            .invocation(&target(&settings, None, None))
            .unwrap();
        assert_eq!(
            invocation.args[3..],
            ["--single-quote", "--tab-width", "4"]
        );

        settings.set("npx.executable_path", "/usr/local/bin/npx").unwrap();
        let project = ProjectConfig {
            use_prettier_from_node_modules: Some(true),
            prettier_arguments: Some("--no-semi".to_string()),
            ..Default::default()
        };
        let invocation = Formatter::Prettier
            .invocation(&target(&settings, Some(&project), None))
            .unwrap();
        assert_eq!(
            invocation.args,
            vec![
                "/usr/local/bin/npx",
                "prettier",
                "/repo/.polyfmt_tmp.c",
                "--write",
                "--no-semi"
            ]
        );
    }

    #[test]
    fn test_missing_executable_is_error() {
        let settings = GlobalSettings::default();
        let err = Formatter::SwiftFormat
            .invocation(&target(&settings, None, None))
            .unwrap_err();
        assert_eq!(err.to_string(), "SwiftFormat executable path not set.");
    }

    #[test]
    fn test_format_maps_failure_to_external_tool_failure() {
        let settings = settings_with(Formatter::SwiftFormat, "swiftformat");
        let runner = MockProcessRunner::new();
        runner.set_output(
            "swiftformat",
            CommandOutput {
                exit_code: 1,
                stdout: String::new(),
                stderr: "syntax error at line 3\n".to_string(),
            },
        );

        let err = Formatter::SwiftFormat
            .format(&runner, &target(&settings, None, None))
            .unwrap_err();

        match err {
            PolyfmtError::ExternalToolFailure(text) => assert_eq!(text, "syntax error at line 3"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_from_str_round_trips_ids() {
        for formatter in Formatter::ALL {
            assert_eq!(formatter.id().parse::<Formatter>().unwrap(), formatter);
        }
        assert!("rustfmt".parse::<Formatter>().is_err());
    }
}
