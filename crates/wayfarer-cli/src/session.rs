use anyhow::Result;
use bat::PrettyPrinter;
use cliclack::{input, spinner};
use console::style;

use wayfarer::agent::Agent;
use wayfarer::errors::AgentError;

pub struct Session {
    agent: Agent,
}

impl Session {
    pub fn new(agent: Agent) -> Self {
        Session { agent }
    }

    /// Answer a single query and exit.
    pub async fn run_once(&mut self, query: &str) -> Result<()> {
        self.process(query).await
    }

    /// Interactive loop: one fresh conversation per query.
    pub async fn start(&mut self) -> Result<()> {
        println!(
            "{}",
            style("Describe your trip — destination, days, budget. Type \"exit\" to quit.").dim()
        );

        loop {
            let query: String = input("Travel query:")
                .placeholder("E.g. I want to visit Goa for 5 days with a budget of 30,000 INR")
                .multiline()
                .interact()?;

            let trimmed = query.trim();
            if trimmed.eq_ignore_ascii_case("exit") {
                break;
            }
            if trimmed.is_empty() {
                continue;
            }

            self.process(trimmed).await?;
        }

        Ok(())
    }

    async fn process(&mut self, query: &str) -> Result<()> {
        let spin = spinner();
        spin.start("Planning your trip...");

        let cancel = self.agent.cancellation_token();
        let result = tokio::select! {
            result = self.agent.ask(query) => result,
            _ = tokio::signal::ctrl_c() => {
                cancel.cancel();
                Err(AgentError::Cancelled)
            }
        };
        spin.stop("");

        match result {
            Ok(answer) => {
                println!("{}", style("Your travel plan is ready:").green().bold());
                render_markdown(&answer);
            }
            Err(AgentError::Cancelled) => {
                self.agent.reset_cancellation();
                println!("{}", style(" Interrupted — the query was cancelled.").yellow());
            }
            Err(e) => {
                eprintln!("{} {}", style("error:").red().bold(), e);
                eprintln!(
                    "{}",
                    style("Fix the configuration above and resubmit the query.").dim()
                );
            }
        }

        Ok(())
    }
}

fn render_markdown(content: &str) {
    let printed = PrettyPrinter::new()
        .input_from_bytes(content.as_bytes())
        .language("markdown")
        .print()
        .unwrap_or(false);
    if !printed {
        println!("{content}");
    }
    println!("\n");
}
