use crate::api::SnippetApi;
use crate::app::SnippetController;
use crate::cli::{Commands, SnippetCli};
use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::interactive::run_interactive;
use crate::models::DraftField;
use crate::ui::{snippet_card, EMPTY_MESSAGE};
use ratatui::text::Line;
use tracing::info;

pub async fn handle_command(cli: SnippetCli) -> Result<()> {
    let config = ClientConfig::resolve(cli.base_url);
    let api = SnippetApi::new(&config)?;
    info!(endpoint = api.endpoint(), "snippet client starting");

    match cli.commands {
        None => run_interactive(api).await,
        Some(command) => {
            let mut controller = SnippetController::new(api);
            let output = handle_subcommand(&mut controller, command).await?;
            print!("{}", output);
            Ok(())
        }
    }
}

/// Run one headless command and return what it should print.
pub async fn handle_subcommand(
    controller: &mut SnippetController,
    command: Commands,
) -> Result<String> {
    match command {
        Commands::List { lang, limit } => {
            controller.set_filter_language(lang.unwrap_or_default());
            controller.set_filter_limit(limit.map(|l| l.to_string()).unwrap_or_default());
            controller.apply_filter().await;
            check_error(controller)?;

            let snippets = &controller.state().snippets;
            if snippets.is_empty() {
                return Ok(format!("{}\n", EMPTY_MESSAGE));
            }
            Ok(snippets
                .iter()
                .flat_map(|snippet| snippet_card(snippet, None))
                .map(plain_line)
                .collect())
        }
        Commands::Add {
            title,
            language,
            code,
            description,
            tags,
        } => {
            controller.update_draft_field(DraftField::Title, title);
            controller.update_draft_field(DraftField::Language, language);
            controller.update_draft_field(DraftField::Code, code);
            controller.update_draft_field(DraftField::Description, description.unwrap_or_default());
            controller.update_draft_field(DraftField::Tags, tags.unwrap_or_default());
            controller.submit_new_snippet().await;
            check_error(controller)?;

            let created = controller.state().snippets.first().ok_or_else(|| {
                ClientError::Other("Snippet was created but not returned".to_string())
            })?;
            let mut output: String = snippet_card(created, None).into_iter().map(plain_line).collect();
            output.push_str("Snippet added successfully\n");
            Ok(output)
        }
    }
}

fn check_error(controller: &SnippetController) -> Result<()> {
    match &controller.state().error {
        Some(error) => Err(ClientError::Other(error.clone())),
        None => Ok(()),
    }
}

fn plain_line(line: Line<'_>) -> String {
    let mut text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
    text.push('\n');
    text
}
