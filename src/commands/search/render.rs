use crate::backends::Package;
use crate::ui;
use colored::Colorize;

/// One line per package: name, version and installed marker, followed by the
/// description cut to the terminal width.
pub(crate) fn print_packages(packages: &[Package]) {
    let width = ui::term_width();
    for package in packages {
        println!("{}", package_line(package));
        if let Some(desc) = &package.description {
            let text = ui::truncate(desc, width.saturating_sub(4).max(20));
            println!("    {}", text.dimmed());
        }
    }
}

pub(super) fn package_line(package: &Package) -> String {
    let mut line = format!("  {}", package.name.cyan().bold());
    if let Some(version) = &package.version {
        line.push(' ');
        line.push_str(&version.bright_black().to_string());
    }
    if package.installed {
        line.push(' ');
        line.push_str(&"[installed]".green().to_string());
    }
    line
}
