// Server selection: turn "which server?" into a stable identifier.
//
// Display names are not unique on the panel. Names that appear more than
// once are shown as "<name> (<identifier>)" so every entry in the prompt
// maps to exactly one server. The prompt itself sits behind the `Chooser`
// trait; the terminal implementation lives in `ui`.

use std::collections::HashMap;

use crate::api::PanelClient;
use crate::config::Credential;
use crate::error::PanelError;
use crate::models::Server;
use crate::ui;

/// A single-choice prompt.
pub trait Chooser {
    /// Show `items` and wait for one pick. `Ok(None)` means the operator
    /// cancelled the prompt.
    fn choose(&mut self, prompt: &str, items: &[String]) -> Result<Option<usize>, PanelError>;
}

/// One selectable line in the prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub label: String,
    pub identifier: String,
}

/// Build prompt entries in panel order, suffixing duplicated names with
/// their identifier.
pub fn build_choices(servers: &[Server]) -> Vec<Choice> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for server in servers {
        *counts.entry(server.name.as_str()).or_default() += 1;
    }

    servers
        .iter()
        .map(|server| {
            let label = if counts[server.name.as_str()] > 1 {
                format!("{} ({})", server.name, server.identifier)
            } else {
                server.name.clone()
            };
            Choice {
                label,
                identifier: server.identifier.clone(),
            }
        })
        .collect()
}

/// Let the operator pick one of `servers`.
///
/// Returns `Ok(None)` when there is nothing to choose from and
/// `Err(PanelError::SelectionCancelled)` when the prompt is cancelled.
pub fn choose_server(
    servers: &[Server],
    chooser: &mut dyn Chooser,
) -> Result<Option<String>, PanelError> {
    if servers.is_empty() {
        return Ok(None);
    }
    let choices = build_choices(servers);
    let labels: Vec<String> = choices.iter().map(|c| c.label.clone()).collect();

    match chooser.choose("Select a server", &labels)? {
        Some(index) => choices
            .get(index)
            .map(|c| Some(c.identifier.clone()))
            .ok_or(PanelError::SelectionCancelled),
        None => Err(PanelError::SelectionCancelled),
    }
}

/// Fetch the servers visible to `credential` and prompt for one.
///
/// Any failed panel call is returned unchanged and no prompt is shown.
pub fn select_server(
    client: &PanelClient,
    credential: &Credential,
    chooser: &mut dyn Chooser,
) -> Result<Option<String>, PanelError> {
    let servers = ui::with_spinner("Fetching servers...", || client.list_servers(credential))?;
    choose_server(&servers, chooser)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Limits;

    fn server(name: &str, identifier: &str) -> Server {
        Server {
            identifier: identifier.into(),
            name: name.into(),
            is_owned_by_caller: true,
            is_suspended: false,
            limits: Limits::default(),
        }
    }

    /// Picks the entry with a given label, or cancels.
    struct Pick(Option<&'static str>, Vec<String>);

    impl Chooser for Pick {
        fn choose(&mut self, _prompt: &str, items: &[String]) -> Result<Option<usize>, PanelError> {
            self.1 = items.to_vec();
            Ok(self.0.and_then(|label| items.iter().position(|i| i == label)))
        }
    }

    #[test]
    fn unique_names_are_shown_bare() {
        let choices = build_choices(&[server("lobby", "a1"), server("survival", "b2")]);
        let labels: Vec<_> = choices.iter().map(|c| c.label.as_str()).collect();
        assert_eq!(labels, ["lobby", "survival"]);
    }

    #[test]
    fn duplicate_names_are_disambiguated() {
        let servers = [server("X", "id1"), server("lobby", "l1"), server("X", "id2")];
        let mut chooser = Pick(Some("X (id1)"), Vec::new());
        assert_eq!(choose_server(&servers, &mut chooser).unwrap().as_deref(), Some("id1"));
        assert_eq!(chooser.1, ["X (id1)", "lobby", "X (id2)"]);

        let mut chooser = Pick(Some("X (id2)"), Vec::new());
        assert_eq!(choose_server(&servers, &mut chooser).unwrap().as_deref(), Some("id2"));
    }

    #[test]
    fn cancelled_prompt_never_yields_a_server() {
        let servers = [server("lobby", "a1")];
        let mut chooser = Pick(None, Vec::new());
        let err = choose_server(&servers, &mut chooser).unwrap_err();
        assert!(err.is_cancellation());
    }

    #[test]
    fn empty_list_skips_the_prompt() {
        let mut chooser = Pick(Some("anything"), Vec::new());
        assert_eq!(choose_server(&[], &mut chooser).unwrap(), None);
        assert!(chooser.1.is_empty());
    }
}
