use load::{ Config, Runner };
use tracing::warn;

fn main() {
    load::logging::init();

    let config = Config::parse().unwrap_or_else(|err| {
        eprintln!("{}", err);
        std::process::exit(1);
    });

    println!(
        "Load testing {} with {} workers for {:?}\n",
        config.url,
        config.workers,
        config.duration
    );

    let runner = Runner::new(config);

    // first Ctrl+C drains the workers and still prints the report, a second one exits
    let stop = runner.stop_signal();
    let handler = move || {
        if stop.is_stopped() {
            std::process::exit(130);
        }
        stop.stop();
    };
    if let Err(err) = ctrlc::set_handler(handler) {
        warn!("failed to install Ctrl+C handler: {}", err);
    }

    match runner.run() {
        Ok(mut report) => {
            report.print();
            println!("\nLoad testing finished");
        }
        Err(err) => {
            eprintln!("{}", err);
            std::process::exit(1);
        }
    }
}
