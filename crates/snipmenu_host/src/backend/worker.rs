//! Coordinator worker thread.
//!
//! One thread owns the store, the remote fetcher, the menu host, and the
//! cached index. Commands run to completion one at a time, so a reload fully
//! replaces the cached snapshot before the next click can resolve against it
//! (last write wins without locks or generation counters). No failure here is
//! fatal: the loop keeps consuming commands.

use crate::backend::{CoreCmd, CoreErrorSource, CoreEvent, TemplateSummary};
use crate::menu::{self, ChannelMenuHost, MenuHost};
use crossbeam_channel::{unbounded, Receiver, Sender};
use snipmenu_core::models::template::{CreateTemplateRequest, UpdateTemplateRequest};
use snipmenu_core::{RemoteFetcher, Store, TemplateIndex};
use std::thread;
use tracing::{error, info, warn};

/// Handle for sending commands to, and receiving events from, the worker.
pub struct BackendHandle {
    pub cmd_tx: Sender<CoreCmd>,
    pub evt_rx: Receiver<CoreEvent>,
}

pub(crate) struct Coordinator<M: MenuHost> {
    store: Store,
    fetcher: RemoteFetcher,
    menu: M,
    evt_tx: Sender<CoreEvent>,
    /// Snapshot used to resolve menu clicks between reloads. Enforcement of
    /// locked records also reads this snapshot, so it reflects the menu the
    /// user last saw.
    cached_index: TemplateIndex,
}

impl<M: MenuHost> Coordinator<M> {
    pub(crate) fn new(store: Store, fetcher: RemoteFetcher, menu: M, evt_tx: Sender<CoreEvent>) -> Self {
        Self {
            store,
            fetcher,
            menu,
            evt_tx,
            cached_index: TemplateIndex::default(),
        }
    }

    fn send(&self, event: CoreEvent) {
        let _ = self.evt_tx.send(event);
    }

    fn send_error(&self, source: CoreErrorSource, message: String) {
        self.send(CoreEvent::Error { source, message });
    }

    fn summaries(&self) -> Vec<TemplateSummary> {
        self.cached_index
            .entries()
            .iter()
            .enumerate()
            .map(|(position, entry)| TemplateSummary::from_entry(position, entry))
            .collect()
    }

    /// Recompute the index from the store and a fresh remote fetch, then
    /// rewrite the menu. The new snapshot replaces the cache wholesale.
    fn reload(&mut self) {
        let user = match self.store.load_templates() {
            Ok(user) => user,
            Err(err) => {
                error!("template load failed: {}", err);
                self.send_error(CoreErrorSource::Other, format!("Load failed: {}", err));
                return;
            }
        };
        let url = match self.store.remote_source_url() {
            Ok(url) => url,
            Err(err) => {
                error!("remote source lookup failed: {}", err);
                self.send_error(CoreErrorSource::Other, format!("Load failed: {}", err));
                return;
            }
        };
        let remote = self.fetcher.fetch_or_default(&url);

        self.cached_index = TemplateIndex::build(&user, &remote);
        match menu::rebuild(&mut self.menu, &self.cached_index) {
            Ok(added) => info!(added, "menu rebuilt"),
            Err(err) => {
                error!("menu rebuild failed: {}", err);
                self.send_error(CoreErrorSource::Menu, format!("Menu rebuild failed: {}", err));
            }
        }
        self.send(CoreEvent::MenuRebuilt {
            entries: self.summaries(),
        });
    }

    fn resolve_click(&self, entry_id: &str) {
        let resolved = menu::parse_entry_id(entry_id)
            .and_then(|position| self.cached_index.get(position))
            .filter(|entry| entry.template.is_menu_ready());
        match resolved {
            Some(entry) => self.send(CoreEvent::InsertText {
                text: entry.template.content.clone(),
            }),
            // Storage may have changed between menu build and click; fail
            // closed without attempting an insertion.
            None => warn!(entry_id = %entry_id, "stale or foreign menu identifier, ignoring click"),
        }
    }

    fn locked_message(id: &str) -> String {
        format!("Template '{}' is read-only (remote default)", id)
    }

    pub(crate) fn handle(&mut self, cmd: CoreCmd) {
        match cmd {
            CoreCmd::ReloadMenu => self.reload(),
            CoreCmd::MenuClicked { entry_id } => self.resolve_click(&entry_id),
            CoreCmd::ListTemplates => {
                self.send(CoreEvent::TemplateList {
                    entries: self.summaries(),
                });
            }
            CoreCmd::CreateTemplate { name, content } => {
                match self.store.create_template(CreateTemplateRequest { name, content }) {
                    Ok(template) => {
                        self.send(CoreEvent::TemplateSaved { template });
                        self.reload();
                    }
                    Err(err) => {
                        error!("template create failed: {}", err);
                        self.send_error(CoreErrorSource::Save, format!("Create failed: {}", err));
                    }
                }
            }
            CoreCmd::UpdateTemplate { id, name, content } => {
                if self.cached_index.is_locked(&id) {
                    self.send_error(CoreErrorSource::Save, Self::locked_message(&id));
                    return;
                }
                let update = UpdateTemplateRequest { name, content };
                match self.store.update_template(&id, update) {
                    Ok(Some(template)) => {
                        self.send(CoreEvent::TemplateSaved { template });
                        self.reload();
                    }
                    Ok(None) => self.send(CoreEvent::TemplateMissing { id }),
                    Err(err) => {
                        error!("template update failed: {}", err);
                        self.send_error(CoreErrorSource::Save, format!("Update failed: {}", err));
                    }
                }
            }
            CoreCmd::DeleteTemplate { id } => {
                if self.cached_index.is_locked(&id) {
                    self.send_error(CoreErrorSource::Save, Self::locked_message(&id));
                    return;
                }
                match self.store.delete_template(&id) {
                    Ok(true) => {
                        self.send(CoreEvent::TemplateDeleted { id });
                        self.reload();
                    }
                    Ok(false) => self.send(CoreEvent::TemplateMissing { id }),
                    Err(err) => {
                        error!("template delete failed: {}", err);
                        self.send_error(CoreErrorSource::Save, format!("Delete failed: {}", err));
                    }
                }
            }
            CoreCmd::SetRemoteSource { url } => {
                let url = url.trim().to_string();
                match self.store.set_remote_source_url(&url) {
                    Ok(()) => {
                        self.send(CoreEvent::RemoteSourceSaved { url });
                        self.reload();
                    }
                    Err(err) => {
                        error!("remote source save failed: {}", err);
                        self.send_error(CoreErrorSource::Save, format!("Save failed: {}", err));
                    }
                }
            }
            CoreCmd::ValidateRemoteSource { url } => match self.fetcher.fetch(&url) {
                Ok(templates) => self.send(CoreEvent::RemoteSourceValidated {
                    url,
                    count: templates.len(),
                }),
                Err(err) => self.send_error(CoreErrorSource::Remote, err.to_string()),
            },
        }
    }
}

/// Spawn the coordinator worker thread.
///
/// Menu mutations are forwarded over the event channel as [`CoreEvent::Menu`]
/// values so the embedding shell can mirror them into its native menu.
///
/// # Returns
/// A [`BackendHandle`] containing the command sender and event receiver.
///
/// # Panics
/// Panics if the worker thread cannot be spawned.
pub fn spawn_backend(store: Store, fetcher: RemoteFetcher) -> BackendHandle {
    let (cmd_tx, cmd_rx) = unbounded();
    let (evt_tx, evt_rx) = unbounded();

    thread::Builder::new()
        .name("snipmenu-coordinator".to_string())
        .spawn(move || {
            let menu = ChannelMenuHost::new(evt_tx.clone());
            let mut coordinator = Coordinator::new(store, fetcher, menu, evt_tx);
            for cmd in cmd_rx.iter() {
                coordinator.handle(cmd);
            }
        })
        .expect("spawn coordinator thread");

    BackendHandle { cmd_tx, evt_rx }
}
