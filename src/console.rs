use crate::callback::{CallbackDispatcher, CallbackLookup, ExecutionContext, TokenChange};
use anyhow::{bail, Result};

/// Parse one console line and fire the event it names.
///
/// Commands:
/// - `selection`
/// - `impersonated`
/// - `token <id> [update] [params...]`
///
/// A blank line is a no-op. Returns the number of invocations submitted.
pub fn run_command<C, L>(
    dispatcher: &CallbackDispatcher<C>,
    callbacks: &L,
    line: &str,
) -> Result<usize>
where
    C: ExecutionContext,
    L: CallbackLookup + ?Sized,
{
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(0);
    };

    let submitted = match command {
        "selection" => dispatcher.selection_changed(callbacks)?,
        "impersonated" => dispatcher.impersonated_changed(callbacks)?,
        "token" => {
            let Some(token_id) = words.next() else {
                bail!("usage: token <id> [update] [params...]");
            };
            let mut change = TokenChange::new(token_id);
            if let Some(update) = words.next() {
                change = change.with_update(update);
            }
            let parameters: Vec<&str> = words.collect();
            if !parameters.is_empty() {
                change = change.with_parameters(parameters);
            }
            dispatcher.token_changed(&change, callbacks)?
        }
        other => bail!("unknown command '{}'", other),
    };

    Ok(submitted)
}

#[cfg(test)]
mod console_tests {
    use super::*;
    use crate::callback::DispatchError;
    use std::collections::HashMap;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingContext {
        submitted: Mutex<Vec<String>>,
    }

    impl ExecutionContext for RecordingContext {
        fn submit(&self, invocation: String) -> Result<(), DispatchError> {
            self.submitted.lock().unwrap().push(invocation);
            Ok(())
        }
    }

    fn panel() -> HashMap<String, String> {
        [
            ("onChangeSelection", "sel@lib:panel;"),
            ("onChangeImpersonated", "imp@lib:panel;"),
            ("onChangeToken", "tok@lib:panel;"),
            ("onChangeToken_2", "tok2@lib:panel;"),
        ]
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn submitted(dispatcher: &CallbackDispatcher<RecordingContext>) -> Vec<String> {
        dispatcher.context().submitted.lock().unwrap().clone()
    }

    #[test]
    fn test_blank_line_is_a_no_op() {
        let dispatcher = CallbackDispatcher::new(RecordingContext::default());

        assert_eq!(run_command(&dispatcher, &panel(), "").unwrap(), 0);
        assert_eq!(run_command(&dispatcher, &panel(), "   \t").unwrap(), 0);
        assert!(submitted(&dispatcher).is_empty());
    }

    #[test]
    fn test_trigger_commands() {
        let dispatcher = CallbackDispatcher::new(RecordingContext::default());

        assert_eq!(run_command(&dispatcher, &panel(), "selection").unwrap(), 1);
        assert_eq!(run_command(&dispatcher, &panel(), "  impersonated ").unwrap(), 1);
        assert_eq!(
            submitted(&dispatcher),
            vec!["sel@lib:panel;", "imp@lib:panel;"]
        );
    }

    #[test]
    fn test_token_with_id_only() {
        let dispatcher = CallbackDispatcher::new(RecordingContext::default());

        assert_eq!(run_command(&dispatcher, &panel(), "token T1").unwrap(), 2);
        assert_eq!(
            submitted(&dispatcher),
            vec!["tok@lib:panel;T1", r#"tok2@lib:panel;{"tokenId":"T1"};"#]
        );
    }

    #[test]
    fn test_token_update_without_params_omits_parameters() {
        let dispatcher = CallbackDispatcher::new(RecordingContext::default());

        run_command(&dispatcher, &panel(), "token X Move").unwrap();
        let record = &submitted(&dispatcher)[1];
        assert_eq!(record, r#"tok2@lib:panel;{"tokenId":"X","update":"Move"};"#);
        assert!(!record.contains("parameters"));
    }

    #[test]
    fn test_token_params_are_escaped_in_order() {
        let dispatcher = CallbackDispatcher::new(RecordingContext::default());

        run_command(&dispatcher, &panel(), "token X Move a;b c").unwrap();
        assert_eq!(
            submitted(&dispatcher)[1],
            r#"tok2@lib:panel;{"tokenId":"X","update":"Move","parameters":["a%3Bb","c"]};"#
        );
    }

    #[test]
    fn test_token_without_id_fails() {
        let dispatcher = CallbackDispatcher::new(RecordingContext::default());

        let err = run_command(&dispatcher, &panel(), "token").unwrap_err();
        assert!(err.to_string().contains("usage: token <id>"));
        assert!(submitted(&dispatcher).is_empty());
    }

    #[test]
    fn test_unknown_command_fails() {
        let dispatcher = CallbackDispatcher::new(RecordingContext::default());

        let err = run_command(&dispatcher, &panel(), "teleport T1").unwrap_err();
        assert_eq!(err.to_string(), "unknown command 'teleport'");
        assert!(submitted(&dispatcher).is_empty());
    }

    #[test]
    fn test_commands_read_the_map_per_call() {
        let dispatcher = CallbackDispatcher::new(RecordingContext::default());
        let mut map = panel();
        map.remove("onChangeToken");

        assert_eq!(run_command(&dispatcher, &map, "token T2").unwrap(), 1);
        assert_eq!(
            submitted(&dispatcher),
            vec![r#"tok2@lib:panel;{"tokenId":"T2"};"#]
        );
    }
}
