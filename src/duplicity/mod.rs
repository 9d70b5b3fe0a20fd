//! Translates the configuration plus a requested subcommand into a duplicity
//! invocation: argument vector, secret environment and an optional filter
//! for the output lines.

use std::str::FromStr;

use regex::Regex;

use crate::config::Config;
use crate::error::CommandError;
use crate::types::Subcommand;

pub mod fragments;

use fragments::Fragment;

const CHANGED_FILES_PREFIX: [&str; 3] = ["--dry-run", "--verbosity", "8"];
const CHANGED_FILES_FILTER: &str = "^[ADM] ";

#[derive(Debug, Clone)]
pub struct DuplicityCommand {
    pub args: Vec<String>,
    pub env: Vec<String>,
    pub line_filter: Option<Regex>,
}

/// Where a positional path of a full recipe comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Location {
    Root,
    Destination,
    /// Last trailing argument of the invocation.
    Target,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Layout {
    /// Source and target paths plus include/exclude selection.
    Full { source: Location, target: Location },
    /// Operates on the destination only.
    Lite,
    /// Removal of old backup chains driven by the cleanup policy.
    RemoveOld,
}

#[derive(Debug, Clone, Copy)]
struct Recipe {
    option: &'static str,
    layout: Layout,
    add_time: bool,
}

impl Recipe {
    const fn full(option: &'static str, source: Location, target: Location) -> Self {
        Recipe {
            option,
            layout: Layout::Full { source, target },
            add_time: false,
        }
    }

    const fn lite(option: &'static str) -> Self {
        Recipe {
            option,
            layout: Layout::Lite,
            add_time: false,
        }
    }
}

fn recipe_for(cmd: Subcommand) -> Recipe {
    use Location::*;
    match cmd {
        Subcommand::Backup | Subcommand::ListChangedFiles => Recipe::full("", Root, Destination),
        Subcommand::Full => Recipe::full("full", Root, Destination),
        Subcommand::Incr => Recipe::full("incr", Root, Destination),
        Subcommand::Cleanup => Recipe::lite("cleanup"),
        Subcommand::ListCurrentFiles => Recipe::lite("list-current-files"),
        Subcommand::Status => Recipe::lite("collection-status"),
        Subcommand::Restore => Recipe {
            add_time: true,
            ..Recipe::full("restore", Destination, Target)
        },
        Subcommand::Verify => Recipe::full("verify", Destination, Root),
        Subcommand::RemoveOld => Recipe {
            option: "",
            layout: Layout::RemoveOld,
            add_time: false,
        },
    }
}

/// Builds the duplicity invocation for `argv` (`argv[0]` is the subcommand).
///
/// `time` is only used by recipes that accept `--time`; pass an empty string
/// to leave it out.
pub fn generate_command(
    cfg: &Config,
    argv: &[String],
    time: &str,
) -> Result<DuplicityCommand, CommandError> {
    let name = argv.first().map(String::as_str).unwrap_or_default();
    let cmd = Subcommand::from_str(name)?;
    let recipe = recipe_for(cmd);

    let mut frag = match recipe.layout {
        Layout::Full { source, target } => {
            let (restore_file, target_arg) = if target == Location::Target {
                restore_arguments(&argv[1..])?
            } else {
                (None, None)
            };
            let resolve = |loc: Location| match loc {
                Location::Root => cfg.root_path.clone(),
                Location::Destination => cfg.destination.clone(),
                Location::Target => target_arg.clone().unwrap_or_default(),
            };
            full_command(
                cfg,
                recipe.option,
                time,
                &resolve(source),
                &resolve(target),
                recipe.add_time,
                restore_file.as_deref().unwrap_or(""),
            )
        }
        Layout::Lite => lite_command(cfg, recipe.option, time, recipe.add_time),
        Layout::RemoveOld => remove_command(cfg),
    };

    let mut line_filter = None;
    if cmd == Subcommand::ListChangedFiles {
        let mut args: Vec<String> = CHANGED_FILES_PREFIX.iter().map(|s| s.to_string()).collect();
        args.append(&mut frag.args);
        frag.args = args;
        line_filter = Some(Regex::new(CHANGED_FILES_FILTER)?);
    }

    frag.env.extend(fragments::credentials(cfg));

    Ok(DuplicityCommand {
        args: fragments::clean(frag.args),
        env: fragments::clean(frag.env),
        line_filter,
    })
}

/// Splits `[file-to-restore] <target>` into its two parts.
fn restore_arguments(rest: &[String]) -> Result<(Option<String>, Option<String>), CommandError> {
    match rest {
        [target] => Ok((None, Some(target.clone()))),
        [file, target] => Ok((Some(file.clone()), Some(target.clone()))),
        other => Err(CommandError::RestoreArguments(other.len())),
    }
}

fn time_args(time: &str, add_time: bool) -> Vec<String> {
    if add_time && !time.is_empty() {
        vec!["--time".to_string(), time.to_string()]
    } else {
        Vec::new()
    }
}

fn full_command(
    cfg: &Config,
    option: &str,
    time: &str,
    root: &str,
    dest: &str,
    add_time: bool,
    restore_file: &str,
) -> Fragment {
    let mut out = Fragment::default();
    out.args.push(option.to_string());
    out.args.extend(cfg.static_options.iter().cloned());
    out.args.extend(time_args(time, add_time));
    if !restore_file.is_empty() {
        out.args.push("--file-to-restore".to_string());
        out.args.push(restore_file.to_string());
    }
    // empty unless configured, removed by clean()
    out.args.push(cfg.aws.storage_class.clone());
    out.extend(fragments::encryption(cfg, option));
    out.extend(fragments::include_exclude(cfg));
    out.args.push(root.to_string());
    out.args.push(dest.to_string());
    out
}

fn lite_command(cfg: &Config, option: &str, time: &str, add_time: bool) -> Fragment {
    let mut out = Fragment::default();
    out.args.push(option.to_string());
    out.args.extend(cfg.static_options.iter().cloned());
    out.args.extend(time_args(time, add_time));
    out.extend(fragments::encryption(cfg, option));
    out.args.push(cfg.destination.clone());
    out
}

fn remove_command(cfg: &Config) -> Fragment {
    let mut out = Fragment::default();
    out.args.push(cfg.cleanup.kind.clone());
    out.args.push(cfg.cleanup.value.clone());
    out.args.extend(cfg.static_options.iter().cloned());
    out.extend(fragments::encryption(cfg, &cfg.cleanup.kind));
    out.args.push("--force".to_string());
    out.args.push(cfg.destination.clone());
    out
}
