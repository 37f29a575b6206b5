//! Deletes every document in the configured collection ("assignments" by default).
//!
//! Run once, without arguments. Progress goes to stdout, failures to stderr.

use std::process::ExitCode;

use campusgate::cleanup::Cleanup;
use campusgate::config::load_config;
use campusgate::firebase::FirebaseApp;
use campusgate::utils::logger::init_logging;
use inline_colorization::*;

#[tokio::main]
async fn main() -> ExitCode {
    let config = load_config();
    if let Err(e) = init_logging(&config.logging) {
        eprintln!("{}", e);
        return ExitCode::FAILURE;
    }

    let app = match FirebaseApp::initialize(&config.firebase) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("{color_red}Could not initialize firebase: {}{color_reset}", e);
            return ExitCode::FAILURE;
        }
    };

    let cleanup = Cleanup::new(app.firestore(), config.cleanup.clone());
    let collection = cleanup.collection().to_string();
    println!("{color_cyan}Starting cleanup of '{}'...{color_reset}", collection);

    let report = match cleanup.run().await {
        Ok(report) => report,
        Err(e) => {
            eprintln!("{color_red}Error cleaning up '{}': {}{color_reset}", collection, e);
            return ExitCode::FAILURE;
        }
    };

    println!("Found {} documents to delete", report.found);
    if report.found == 0 {
        println!("{color_green}No documents found, '{}' is already clean{color_reset}", collection);
        return ExitCode::SUCCESS;
    }

    if report.is_success() {
        println!(
            "{color_green}Deleted all {} documents from '{}'{color_reset}",
            report.deleted, collection
        );
        return ExitCode::SUCCESS;
    }

    eprintln!(
        "{color_red}Deleted {} of {} documents from '{}'; {} failed:{color_reset}",
        report.deleted,
        report.found,
        collection,
        report.failures.len()
    );
    for failure in &report.failures {
        eprintln!("  {style_bold}{}{style_reset}: {}", failure.id, failure.error);
    }
    ExitCode::FAILURE
}
