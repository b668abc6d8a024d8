use certvet_inspect::builtin_factories;
use colored::Colorize;

pub fn handle() {
    println!("{}", "Built-in inspectors:".cyan().bold());
    for (name, factory) in builtin_factories() {
        println!("  {:<16} {:?}", name.green(), factory());
    }
}
