//! Interactive review session.

use std::io::Write;
use std::sync::Arc;

use chrono::Utc;
use tracing::warn;

use bunpo_ai::TutorFactory;
use bunpo_core::{
    DueSetSelector, Phase, SessionCard, SessionOrchestrator, TutorConfig,
};
use bunpo_store::SqliteStore;

/// Run one review session end to end.
pub async fn run(config: TutorConfig) -> anyhow::Result<()> {
    let store = Arc::new(SqliteStore::new(config.database_path())?);
    if store.stats(Utc::now())?.total_points == 0 {
        println!("The database is empty. Run `bunpo seed` first.");
        return Ok(());
    }

    let (content, evaluator) = TutorFactory::create(&config.ai)?;
    let speech = bunpo_speech::create_synthesizer(&config.speech)?;
    bunpo_speech::clear_output_dir(&config.speech).await?;

    let selector = DueSetSelector::new(store.clone(), config.batch);
    let mut session = SessionOrchestrator::new(selector, store, content, evaluator, speech);

    let prepared = session
        .prepare_session(|completed, total| {
            print!("\rPreparing cards... {}/{}", completed, total);
            let _ = std::io::stdout().flush();
        })
        .await?;
    println!();

    if prepared == 0 {
        println!("Nothing is due right now. Come back later!");
        return Ok(());
    }
    println!("{} cards ready. Type `quit` to stop early.\n", prepared);

    loop {
        let Some(card) = session.current_card() else {
            break;
        };
        show_card(card, session.remaining_count());

        let answer = loop {
            let line = prompt("Your answer> ")?;
            if !line.trim().is_empty() {
                break line;
            }
            println!("Please write an answer (or `quit`).");
        };
        if answer.trim().eq_ignore_ascii_case("quit") {
            println!("Session ended early. Rated cards are saved.");
            return Ok(());
        }

        let evaluation = session.submit_answer(&answer).await?;
        println!("\n{}", evaluation.feedback);
        if let Some(correction) = &evaluation.correction {
            println!("Correction: {}", correction);
        }
        if let Some(better) = &evaluation.better_sentence {
            println!("Native example: {}", better);
        }
        println!("Suggested score: {}", evaluation.score);

        rate_current(&mut session, evaluation.score).await?;
        println!();
    }

    println!("Session complete. See `bunpo stats` for your progress.");
    Ok(())
}

fn show_card(card: &SessionCard, remaining: usize) {
    println!("--- [{}] {} ({} left) ---", card.grammar.level, card.grammar.concept, remaining);
    if card.degraded {
        println!("(offline card - challenge generation was unavailable)");
    }
    println!("{}", card.content.prompt);
    if let Some(context) = &card.content.context {
        println!("Context: {}", context);
    }
    if let Some(hint) = &card.content.hint {
        println!("Hint: {}", hint);
    }
    if let Some(audio) = &card.audio {
        println!("Audio: {}", audio.display());
    }
}

/// Ask for a 0-5 rating and record it. A failed write keeps the card
/// current, so the learner is re-asked instead of losing the review.
async fn rate_current(session: &mut SessionOrchestrator, suggested: u8) -> anyhow::Result<()> {
    while session.phase() == Some(Phase::Feedback) {
        let line = prompt(&format!(
            "Rate your recall 0-5 (Enter = {})> ",
            suggested
        ))?;
        let trimmed = line.trim();
        let rating = if trimmed.is_empty() {
            suggested
        } else {
            match trimmed.parse::<u8>() {
                Ok(value) => value,
                Err(_) => {
                    println!("Enter a number from 0 to 5.");
                    continue;
                }
            }
        };

        match session.rate(rating).await {
            Ok(()) => {}
            Err(e) if e.code().as_str().starts_with("VAL") => {
                println!("{}", e);
            }
            Err(e) => {
                warn!(error = %e, "rating was not recorded");
                println!("Saving failed ({}). Press Enter to retry.", e);
            }
        }
    }
    Ok(())
}

fn prompt(label: &str) -> anyhow::Result<String> {
    print!("{}", label);
    std::io::stdout().flush()?;
    let mut line = String::new();
    std::io::stdin().read_line(&mut line)?;
    Ok(line.trim_end().to_string())
}
