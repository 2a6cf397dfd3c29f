use clap::Parser;
use tracing::info;

use investo::config::{Cli, Command, Config, validate_reverse_args};
use investo::format::{format_currency, format_currency_short, format_pct};
use investo::logging::init_tracing;
use investo::store::InvestmentStore;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli);
    init_tracing(config.log_format);

    info!(data_dir = %config.data_dir.display(), "opening investo state");
    let store = InvestmentStore::open(config.storage());

    match cli.command {
        Command::Serve { port } => {
            if let Err(e) = investo::api::run_http_server(store, port).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Show => print_summary(&store),
        Command::Reverse {
            target,
            years,
            current_savings,
            rate,
        } => {
            if let Err(msg) = validate_reverse_args(target, years, current_savings) {
                eprintln!("Invalid arguments: {msg}");
                std::process::exit(2);
            }
            let result = store.reverse_goal(target, years, current_savings, rate);
            let currency = &store.state().currency;
            println!("{}", result.message);
            println!("Annual rate:           {}", format_pct(result.annual_rate_pct));
            println!(
                "Monthly contribution:  {}",
                format_currency(result.required.monthly, currency)
            );
            println!(
                "Total contributions:   {}",
                format_currency(result.required.total_contributions, currency)
            );
            println!(
                "Interest earned:       {}",
                format_currency(result.required.interest, currency)
            );
        }
    }
}

fn print_summary(store: &InvestmentStore) {
    print!("{}", render_summary(store));
}

fn render_summary(store: &InvestmentStore) -> String {
    let state = store.state();
    let derived = store.derived();
    let c = &state.currency;

    let mut lines = vec![
        format!("Net income:      {}", format_currency(derived.net_income, c)),
        format!(
            "Split:           needs {} / wants {} / savings {}",
            format_pct(state.split.needs_pct),
            format_pct(state.split.wants_pct),
            format_pct(state.split.savings_pct)
        ),
        format!("Monthly savings: {}", format_currency(derived.savings_monthly, c)),
        format!(
            "Rate:            {} (base {}, inflation {})",
            format_pct(derived.effective_rate),
            format_pct(derived.base_rate),
            format_pct(derived.inflation_rate)
        ),
        format!(
            "After {} years:  {}",
            state.horizon_years,
            format_currency(derived.growth.future_value, c)
        ),
        format!("  principal:     {}", format_currency(derived.growth.principal, c)),
        format!("  interest:      {}", format_currency(derived.growth.interest, c)),
        format!(
            "Monthly passive income: {}/mo",
            format_currency(derived.passive_income, c)
        ),
    ];

    if let Some(next) = store.milestones().next {
        lines.push(format!(
            "Next milestone:  {} at {} ({} to go)",
            next.title,
            format_currency_short(next.threshold, c),
            format_currency_short(next.remaining, c)
        ));
    }
    lines.push(format!("Saved scenarios: {}", store.scenarios().len()));

    let mut out = lines.join("\n");
    out.push('\n');
    out
}
