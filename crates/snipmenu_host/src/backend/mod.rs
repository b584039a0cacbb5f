//! Coordinator worker wiring.
//!
//! This module exposes the command/event protocol plus the worker spawn
//! helper used by the stdio bridge and headless tests.

mod protocol;
mod worker;

pub use protocol::{CoreCmd, CoreErrorSource, CoreEvent, TemplateSummary};
pub use worker::{spawn_backend, BackendHandle};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::menu::{entry_id, MenuOp};
    use snipmenu_core::constants::MENU_ROOT_ID;
    use snipmenu_core::models::template::Template;
    use snipmenu_core::{RemoteFetcher, Store};
    use std::time::Duration;
    use tempfile::TempDir;

    struct TestStore {
        _dir: TempDir,
        store: Store,
    }

    fn setup_store() -> TestStore {
        let dir = TempDir::new().expect("temp dir");
        let store = Store::open(dir.path().to_str().expect("store path")).expect("open store");
        TestStore { _dir: dir, store }
    }

    fn user_record(id: &str, name: &str, content: &str) -> Template {
        Template {
            id: id.to_string(),
            name: name.to_string(),
            content: content.to_string(),
            created_at: None,
            updated_at: None,
        }
    }

    fn recv_event(rx: &crossbeam_channel::Receiver<CoreEvent>) -> CoreEvent {
        rx.recv_timeout(Duration::from_secs(5))
            .expect("expected backend event")
    }

    /// Wait for a reply, skipping interleaved menu mutation events.
    fn recv_reply(rx: &crossbeam_channel::Receiver<CoreEvent>) -> CoreEvent {
        loop {
            match recv_event(rx) {
                CoreEvent::Menu { .. } => continue,
                other => return other,
            }
        }
    }

    /// Consume events until (and including) the next `MenuRebuilt`.
    fn drain_until_rebuilt(rx: &crossbeam_channel::Receiver<CoreEvent>) -> Vec<TemplateSummary> {
        loop {
            if let CoreEvent::MenuRebuilt { entries } = recv_event(rx) {
                return entries;
            }
        }
    }

    #[test]
    fn reload_rebuilds_menu_and_skips_invalid_records() {
        let TestStore { _dir: _guard, store } = setup_store();
        store
            .save_templates(&[
                user_record("t0", "first", "one"),
                user_record("t1", "second", "two"),
                user_record("t2", "broken", ""),
                user_record("t3", "fourth", "four"),
            ])
            .expect("seed templates");

        let backend = spawn_backend(store, RemoteFetcher::new());
        backend.cmd_tx.send(CoreCmd::ReloadMenu).expect("send reload");

        let mut ops = Vec::new();
        let entries = loop {
            match recv_event(&backend.evt_rx) {
                CoreEvent::Menu { op } => ops.push(op),
                CoreEvent::MenuRebuilt { entries } => break entries,
                other => panic!("unexpected event: {:?}", other),
            }
        };

        // The snapshot keeps all four records; the menu skips the invalid one
        // without shifting the identifiers that follow it.
        assert_eq!(entries.len(), 4);
        assert!(matches!(ops[0], MenuOp::RemoveAll));
        assert!(
            matches!(&ops[1], MenuOp::AddRoot { id, editable_only: true, .. } if id == MENU_ROOT_ID)
        );
        let child_ids: Vec<String> = ops
            .iter()
            .filter_map(|op| match op {
                MenuOp::AddEntry { id, .. } => Some(id.clone()),
                _ => None,
            })
            .collect();
        assert_eq!(child_ids, vec![entry_id(0), entry_id(1), entry_id(3)]);
    }

    #[test]
    fn clicked_entry_resolves_to_insert_text() {
        let TestStore { _dir: _guard, store } = setup_store();
        store
            .save_templates(&[
                user_record("t0", "greeting", "Hello!"),
                user_record("t1", "signature", "-- me"),
            ])
            .expect("seed templates");

        let backend = spawn_backend(store, RemoteFetcher::new());
        backend.cmd_tx.send(CoreCmd::ReloadMenu).expect("send reload");
        drain_until_rebuilt(&backend.evt_rx);

        backend
            .cmd_tx
            .send(CoreCmd::MenuClicked {
                entry_id: entry_id(1),
            })
            .expect("send click");

        match recv_reply(&backend.evt_rx) {
            CoreEvent::InsertText { text } => assert_eq!(text, "-- me"),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn stale_or_foreign_clicks_fail_closed() {
        let TestStore { _dir: _guard, store } = setup_store();
        store
            .save_templates(&[user_record("t0", "greeting", "Hello!")])
            .expect("seed templates");

        let backend = spawn_backend(store, RemoteFetcher::new());
        backend.cmd_tx.send(CoreCmd::ReloadMenu).expect("send reload");
        drain_until_rebuilt(&backend.evt_rx);

        // Out of range of the cached snapshot, and a foreign identifier.
        for entry_id in [entry_id(99), "other-menu-item".to_string()] {
            backend
                .cmd_tx
                .send(CoreCmd::MenuClicked { entry_id })
                .expect("send click");
        }
        backend.cmd_tx.send(CoreCmd::ListTemplates).expect("send list");

        // Neither click produced an event; the next reply is the list.
        match recv_reply(&backend.evt_rx) {
            CoreEvent::TemplateList { entries } => assert_eq!(entries.len(), 1),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn crud_commands_persist_and_trigger_reloads() {
        let TestStore { _dir: _guard, store } = setup_store();
        let backend = spawn_backend(store, RemoteFetcher::new());

        backend
            .cmd_tx
            .send(CoreCmd::CreateTemplate {
                name: "greeting".to_string(),
                content: "Hello!".to_string(),
            })
            .expect("send create");

        let created_id = match recv_reply(&backend.evt_rx) {
            CoreEvent::TemplateSaved { template } => {
                assert_eq!(template.name, "greeting");
                template.id
            }
            other => panic!("unexpected event: {:?}", other),
        };
        let entries = drain_until_rebuilt(&backend.evt_rx);
        assert_eq!(entries.len(), 1);

        backend
            .cmd_tx
            .send(CoreCmd::UpdateTemplate {
                id: created_id.clone(),
                name: None,
                content: Some("Hello there!".to_string()),
            })
            .expect("send update");

        match recv_reply(&backend.evt_rx) {
            CoreEvent::TemplateSaved { template } => {
                assert_eq!(template.id, created_id);
                assert_eq!(template.content, "Hello there!");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        drain_until_rebuilt(&backend.evt_rx);

        backend
            .cmd_tx
            .send(CoreCmd::DeleteTemplate {
                id: created_id.clone(),
            })
            .expect("send delete");

        match recv_reply(&backend.evt_rx) {
            CoreEvent::TemplateDeleted { id } => assert_eq!(id, created_id),
            other => panic!("unexpected event: {:?}", other),
        }
        let entries = drain_until_rebuilt(&backend.evt_rx);
        assert!(entries.is_empty());

        backend
            .cmd_tx
            .send(CoreCmd::UpdateTemplate {
                id: created_id.clone(),
                name: Some("ghost".to_string()),
                content: None,
            })
            .expect("send missing update");

        match recv_reply(&backend.evt_rx) {
            CoreEvent::TemplateMissing { id } => assert_eq!(id, created_id),
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn set_remote_source_trims_and_confirms() {
        let TestStore { _dir: _guard, store } = setup_store();
        let backend = spawn_backend(store, RemoteFetcher::new());

        backend
            .cmd_tx
            .send(CoreCmd::SetRemoteSource {
                url: "  http://127.0.0.1:1/templates.json  ".to_string(),
            })
            .expect("send set source");

        match recv_reply(&backend.evt_rx) {
            CoreEvent::RemoteSourceSaved { url } => {
                assert_eq!(url, "http://127.0.0.1:1/templates.json");
            }
            other => panic!("unexpected event: {:?}", other),
        }
        drain_until_rebuilt(&backend.evt_rx);
    }

    #[test]
    fn validate_remote_source_surfaces_failures() {
        let TestStore { _dir: _guard, store } = setup_store();
        let backend = spawn_backend(store, RemoteFetcher::new());

        backend
            .cmd_tx
            .send(CoreCmd::ValidateRemoteSource {
                url: "http://127.0.0.1:1/templates".to_string(),
            })
            .expect("send validate");

        match recv_reply(&backend.evt_rx) {
            CoreEvent::Error { source, .. } => assert_eq!(source, CoreErrorSource::Remote),
            other => panic!("unexpected event: {:?}", other),
        }
    }
}
