mod commands;

use std::env;
use std::path::{Path, PathBuf};

use commands::{check_project, dump_file, fmt_project};
use tessel_project::{ProjectConfig, create_new_project, find_project_root, load_project_toml};

const DEFAULT_PROJECT_NAME: &str = "Tessel Project";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = env::args().collect();
    let cwd = env::current_dir().unwrap_or_else(|_| PathBuf::from("."));

    let Some(command) = args.get(1).map(String::as_str) else {
        print_usage();
        std::process::exit(2);
    };

    let result = match command {
        "new" => new_command(&args, &cwd),
        "check" => check_command(&args, &cwd),
        "fmt" => fmt_command(&args, &cwd),
        "dump" => dump_command(&args, &cwd),
        "help" | "--help" | "-h" => {
            print_usage();
            Ok(())
        }
        _ => {
            print_usage();
            Err(format!("unknown command `{command}`"))
        }
    };

    if let Err(err) = result {
        eprintln!("{err}");
        std::process::exit(1);
    }
}

fn print_usage() {
    eprintln!("Usage:");
    eprintln!("  tessel new [--path <parent_dir>] [--name <project_name>]");
    eprintln!("  tessel check [--path <project_dir>]        # parse, lint and resolve references");
    eprintln!("  tessel fmt [--path <project_dir>] [--check] # rewrite descriptors canonically");
    eprintln!("  tessel dump <file>                         # print a descriptor as JSON");
}

fn parse_flag_value(args: &[String], flag: &str) -> Option<String> {
    let idx = args.iter().position(|a| a == flag)?;
    args.get(idx + 1).cloned()
}

fn has_flag(args: &[String], flag: &str) -> bool {
    args.iter().any(|a| a == flag)
}

fn sanitize_project_dir_name(name: &str) -> String {
    let trimmed = name.trim();
    let mut out = String::with_capacity(trimmed.len());
    for c in trimmed.chars() {
        let invalid = matches!(c, '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*');
        out.push(if invalid { '_' } else { c });
    }

    let collapsed = out.trim_matches('.');
    if collapsed.is_empty() {
        "tessel_project".to_string()
    } else {
        collapsed.to_string()
    }
}

/// `--path` if given, else the nearest ancestor holding `tessel.toml`, else `cwd`.
fn project_dir(args: &[String], cwd: &Path) -> PathBuf {
    match parse_flag_value(args, "--path") {
        Some(p) => cwd.join(p),
        None => find_project_root(cwd).unwrap_or_else(|| cwd.to_path_buf()),
    }
}

fn load_config(project_dir: &Path) -> Result<ProjectConfig, String> {
    if !project_dir.join(tessel_project::PROJECT_FILE).is_file() {
        let name = project_dir
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
        log::warn!(
            "no {} in {}, using defaults",
            tessel_project::PROJECT_FILE,
            project_dir.display()
        );
        return Ok(ProjectConfig::default_for_name(name));
    }
    load_project_toml(project_dir)
        .map_err(|err| format!("failed to load project at {}: {err}", project_dir.display()))
}

fn new_command(args: &[String], cwd: &Path) -> Result<(), String> {
    let base_dir = parse_flag_value(args, "--path")
        .map(|p| cwd.join(p))
        .unwrap_or_else(|| cwd.to_path_buf());
    let project_name =
        parse_flag_value(args, "--name").unwrap_or_else(|| DEFAULT_PROJECT_NAME.to_string());
    let project_dir = base_dir.join(sanitize_project_dir_name(&project_name));

    create_new_project(&project_dir, &project_name)
        .map_err(|err| format!("failed to create project at {}: {err}", project_dir.display()))?;

    println!(
        "created project `{}` at {}",
        project_name,
        project_dir.display()
    );
    Ok(())
}

fn check_command(args: &[String], cwd: &Path) -> Result<(), String> {
    let dir = project_dir(args, cwd);
    let config = load_config(&dir)?;
    let report = check_project(&dir, &config)?;

    for line in &report.lines {
        println!("{line}");
    }
    println!(
        "checked {} file(s): {} error(s), {} warning(s)",
        report.files, report.errors, report.warnings
    );

    if report.errors > 0 {
        return Err(format!("check failed for {}", dir.display()));
    }
    Ok(())
}

fn fmt_command(args: &[String], cwd: &Path) -> Result<(), String> {
    let dir = project_dir(args, cwd);
    let config = load_config(&dir)?;
    let check_only = has_flag(args, "--check");
    let outcome = fmt_project(&dir, &config, !check_only)?;

    for path in &outcome.changed {
        let shown = path.strip_prefix(&dir).unwrap_or(path);
        if check_only {
            println!("would reformat {}", shown.display());
        } else {
            println!("reformatted {}", shown.display());
        }
    }
    for failure in &outcome.failures {
        eprintln!("{failure}");
    }

    if !outcome.failures.is_empty() {
        return Err(format!("{} file(s) could not be formatted", outcome.failures.len()));
    }
    if check_only && !outcome.changed.is_empty() {
        return Err(format!("{} file(s) need formatting", outcome.changed.len()));
    }
    Ok(())
}

fn dump_command(args: &[String], cwd: &Path) -> Result<(), String> {
    let file = args
        .get(2)
        .filter(|a| !a.starts_with("--"))
        .ok_or_else(|| "dump needs a descriptor file".to_string())?;
    println!("{}", dump_file(&cwd.join(file))?);
    Ok(())
}
