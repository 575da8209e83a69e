use console::Style;
use pixmean_core::pipeline::config::AverageConfig;
use pixmean_core::pipeline::RunSummary;

struct Styles {
    title: Style,
    header: Style,
    label: Style,
    value: Style,
    warning: Style,
    path: Style,
}

impl Styles {
    fn new() -> Self {
        Self {
            title: Style::new().cyan().bold(),
            header: Style::new().cyan().bold(),
            label: Style::new().dim(),
            value: Style::new().bold().white(),
            warning: Style::new().yellow(),
            path: Style::new().underlined(),
        }
    }
}

pub fn print_run_header(config: &AverageConfig) {
    let s = Styles::new();
    let workers = config
        .pipeline
        .workers
        .map(|n| n.to_string())
        .unwrap_or_else(|| format!("auto ({})", config.pipeline.worker_count()));

    println!();
    println!("  {}", s.title.apply_to("pixmean"));
    println!("  {}", s.title.apply_to("\u{2550}".repeat(7)));
    println!();
    println!(
        "  {:<14}{}",
        s.label.apply_to("Source"),
        s.path.apply_to(config.source.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Target"),
        s.path.apply_to(config.target.display())
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Workers"),
        s.value.apply_to(workers)
    );
    println!(
        "  {:<14}{}",
        s.label.apply_to("Depth"),
        s.value.apply_to(config.pipeline.depth)
    );
    println!();
}

pub fn print_run_summary(config: &AverageConfig, run: &RunSummary) {
    let s = Styles::new();

    println!("  {}", s.header.apply_to("Result"));
    println!(
        "    {:<12}{}",
        s.label.apply_to("Size"),
        s.value.apply_to(run.dimensions)
    );
    println!(
        "    {:<12}{}",
        s.label.apply_to("Averaged"),
        s.value
            .apply_to(format!("{} of {} files", run.images_folded, run.files_considered))
    );

    if !run.skipped.is_empty() {
        println!(
            "    {:<12}{}",
            s.label.apply_to("Skipped"),
            s.warning.apply_to(run.skipped.len())
        );
        for skipped in &run.skipped {
            println!(
                "      {} {}",
                s.path.apply_to(skipped.path.display()),
                s.label.apply_to(&skipped.reason)
            );
        }
    }
    println!();
    println!("  Saved to {}", s.path.apply_to(config.target.display()));
}
