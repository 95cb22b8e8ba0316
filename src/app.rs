use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;

use crate::config::Config;
use crate::constant::DEFAULT_WINDOW_TITLE;
use crate::logs::ServiceTail;
use crate::messages::ResponseMessage;
use crate::remote::client::ApiClient;
use crate::remote::{AgentInfo, ChatMessage, ServiceInfo, WorkspaceInfo};
use crate::sessions::SessionBoard;
use crate::stream::{TailHandle, spawn_output_tail};
use crate::style::configure_style;
use crate::tree::FileTree;
use crate::ui::chat::{ChatAction, ChatPane};
use crate::ui::diff_view::DiffPane;
use crate::ui::service_view::{ServiceView, ServiceViewAction};
use crate::ui::session_panel::{SessionPanel, SessionPanelAction};
use crate::ui::title_bar::{TitleBar, TitleBarAction};
use crate::ui::tree_view::{TreeAction, TreeView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum WorkPane {
    Files,
    Diff,
    Services,
}

pub struct AgentDeckApp {
    config: Config,
    client: ApiClient,
    sender: Sender<ResponseMessage>,
    receiver: Receiver<ResponseMessage>,

    board: SessionBoard,
    workspaces: Vec<WorkspaceInfo>,
    agents: Vec<AgentInfo>,
    services: Vec<ServiceInfo>,
    pending_select: Option<String>,

    tree: FileTree,
    tail: ServiceTail,
    tail_handle: Option<TailHandle>,

    session_panel: SessionPanel,
    chat: ChatPane,
    diff: DiffPane,
    pane: WorkPane,
}

impl AgentDeckApp {
    pub fn new(cc: &eframe::CreationContext<'_>) -> Self {
        configure_style(&cc.egui_ctx);

        let config = Config::default();
        let client = ApiClient::new(
            &config.settings.server_url,
            &config.settings.project,
            Config::server_secret(),
        );
        let (sender, receiver) = mpsc::channel();

        let app = Self {
            config,
            client,
            sender,
            receiver,
            board: SessionBoard::new(),
            workspaces: Vec::new(),
            agents: Vec::new(),
            services: Vec::new(),
            pending_select: None,
            tree: FileTree::new(),
            tail: ServiceTail::new(),
            tail_handle: None,
            session_panel: SessionPanel::default(),
            chat: ChatPane::new(),
            diff: DiffPane::new(),
            pane: WorkPane::Files,
        };
        app.refresh_directory();
        app
    }

    /// Fetch the project-level lists (sessions, workspaces, agents).
    fn refresh_directory(&self) {
        self.client.list_sessions(self.sender.clone());
        self.client.list_workspaces(self.sender.clone());
        self.client.list_agents(self.sender.clone());
    }

    fn handle_message(&mut self, message: ResponseMessage) {
        match message {
            ResponseMessage::Sessions(Ok(sessions)) => {
                if self.board.apply(sessions) {
                    self.reset_session_panes();
                }
                if let Some(id) = self.pending_select.take() {
                    self.select_session(&id);
                }
            }
            ResponseMessage::Sessions(Err(e)) => {
                tracing::warn!(error = %e, "could not list sessions");
            }
            ResponseMessage::Workspaces(Ok(workspaces)) => self.workspaces = workspaces,
            ResponseMessage::Workspaces(Err(e)) => {
                tracing::warn!(error = %e, "could not list workspaces");
            }
            ResponseMessage::Agents(Ok(agents)) => self.agents = agents,
            ResponseMessage::Agents(Err(e)) => {
                tracing::warn!(error = %e, "could not list agents");
            }
            ResponseMessage::SessionCreated(Ok(session)) => {
                self.pending_select = Some(session.id);
                self.client.list_sessions(self.sender.clone());
            }
            ResponseMessage::SessionCreated(Err(e)) => {
                tracing::warn!(error = %e, "could not create session");
            }
            ResponseMessage::Listing(Ok(listing)) => {
                self.tree.apply_listing(&listing.path, &listing.entries);
            }
            ResponseMessage::Listing(Err(e)) => {
                tracing::warn!(error = %e, "could not list files");
            }
            ResponseMessage::FileLoaded {
                path,
                from_base,
                result,
            } => {
                self.diff.set_result(&path, from_base, result);
            }
            ResponseMessage::Changes(Ok(summary)) => {
                self.tree.apply_changes(&summary.files);
            }
            ResponseMessage::Changes(Err(e)) => {
                tracing::warn!(error = %e, "could not fetch change summary");
            }
            ResponseMessage::Services(Ok(services)) => {
                self.services = services;
                self.sync_tail();
            }
            ResponseMessage::Services(Err(e)) => {
                tracing::warn!(error = %e, "could not list services");
            }
            ResponseMessage::ServiceActionDone(result) => {
                match result {
                    Ok(_) => {}
                    Err(e) => tracing::warn!(error = %e, "service action failed"),
                }
                if let Some(session_id) = self.board.selected_id() {
                    self.client.list_services(session_id, self.sender.clone());
                }
            }
            ResponseMessage::Transcript(Ok(messages)) => self.chat.set_transcript(messages),
            ResponseMessage::Transcript(Err(e)) => {
                tracing::warn!(error = %e, "could not fetch transcript");
            }
            ResponseMessage::PromptFinished(result) => {
                self.chat.set_sending(false);
                if let Err(e) = result {
                    tracing::warn!(error = %e, "prompt failed");
                }
                if let Some(session_id) = self.board.selected_id() {
                    // The agent turn may have touched files as well.
                    self.client.transcript(session_id, self.sender.clone());
                    self.client.change_summary(session_id, self.sender.clone());
                    self.tree.refresh();
                }
            }
            ResponseMessage::ServiceOutput { generation, line } => {
                self.tail.push_line(generation, line);
            }
            ResponseMessage::ServiceOutputDone { generation } => self.tail.finish(generation),
        }
    }

    fn select_session(&mut self, id: &str) {
        if self.board.select(id) {
            self.reset_session_panes();
            self.request_session_data();
        }
    }

    fn reset_session_panes(&mut self) {
        self.tree.reset();
        self.diff.clear();
        self.chat.clear();
        self.tail.unfollow();
        self.tail_handle = None;
        self.services.clear();
    }

    fn request_session_data(&self) {
        if let Some(session_id) = self.board.selected_id() {
            self.client.transcript(session_id, self.sender.clone());
            self.client.change_summary(session_id, self.sender.clone());
            self.client.list_services(session_id, self.sender.clone());
        }
    }

    /// Re-align the output stream with the followed service's current
    /// status: any status change drops the stream and opens a fresh one.
    fn sync_tail(&mut self) {
        let Some(followed) = self.tail.service_id().map(str::to_owned) else {
            return;
        };
        let status = self
            .services
            .iter()
            .find(|s| s.id == followed)
            .map(|s| s.status);
        match status {
            Some(status) => {
                if self.tail.follow(&followed, status) {
                    self.restart_tail();
                }
            }
            None => {
                self.tail.unfollow();
                self.tail_handle = None;
            }
        }
    }

    fn restart_tail(&mut self) {
        self.tail_handle = None;
        let (Some(session_id), Some(service_id)) =
            (self.board.selected_id(), self.tail.service_id())
        else {
            return;
        };
        let url = self.client.service_output_url(session_id, service_id);
        self.tail_handle = Some(spawn_output_tail(
            url,
            self.client.secret(),
            self.tail.generation(),
            self.sender.clone(),
        ));
    }

    /// Kick off listing fetches for expanded-but-unloaded directories.
    fn drive_tree_loads(&mut self) {
        let Some(session) = self.board.selected() else {
            return;
        };
        if !session.status.is_ready() {
            return;
        }
        let session_id = session.id.clone();
        let hidden = self.config.settings.show_hidden_files;
        for path in self.tree.pending_loads() {
            self.client
                .list_files(&session_id, &path, hidden, self.sender.clone());
        }
    }

    fn open_file(&mut self, path: &str) {
        self.pane = WorkPane::Diff;
        self.diff.open_file(path);
        if let Some(session_id) = self.board.selected_id() {
            self.client
                .read_file(session_id, path, true, self.sender.clone());
            self.client
                .read_file(session_id, path, false, self.sender.clone());
        }
    }

    fn handle_session_action(&mut self, action: SessionPanelAction) {
        match action {
            SessionPanelAction::Select(id) => self.select_session(&id),
            SessionPanelAction::Refresh => self.client.list_sessions(self.sender.clone()),
            SessionPanelAction::Create {
                workspace_id,
                agent_id,
                name,
            } => {
                if let Some(workspace) = self.workspaces.iter().find(|w| w.id == workspace_id) {
                    self.config.add_recent_workspace(workspace.path.clone());
                }
                self.client.create_session(
                    &workspace_id,
                    &name,
                    agent_id.as_deref(),
                    self.sender.clone(),
                );
            }
        }
    }

    fn handle_tree_action(&mut self, action: TreeAction) {
        match action {
            TreeAction::Toggle(path) => self.tree.toggle(&path),
            TreeAction::Open(path) => self.open_file(&path),
            TreeAction::Refresh => {
                self.tree.refresh();
                if let Some(session_id) = self.board.selected_id() {
                    self.client.change_summary(session_id, self.sender.clone());
                }
            }
        }
    }

    fn handle_service_action(&mut self, action: ServiceViewAction) {
        let Some(session_id) = self.board.selected_id().map(str::to_owned) else {
            return;
        };
        match action {
            ServiceViewAction::Start(id) => {
                self.client
                    .start_service(&session_id, &id, self.sender.clone());
            }
            ServiceViewAction::Stop(id) => {
                self.client
                    .stop_service(&session_id, &id, self.sender.clone());
            }
            ServiceViewAction::Follow(id) => {
                let status = self.services.iter().find(|s| s.id == id).map(|s| s.status);
                if let Some(status) = status
                    && self.tail.follow(&id, status)
                {
                    self.restart_tail();
                }
            }
            ServiceViewAction::Refresh => {
                self.client.list_services(&session_id, self.sender.clone());
            }
        }
    }

    fn show_work_panel(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            for (pane, label) in [
                (WorkPane::Files, "Files"),
                (WorkPane::Diff, "Diff"),
                (WorkPane::Services, "Services"),
            ] {
                if ui.selectable_label(self.pane == pane, label).clicked() {
                    self.pane = pane;
                }
            }
        });
        ui.separator();

        match self.pane {
            WorkPane::Files => {
                if let Some(action) = TreeView::show(ui, &self.tree, self.diff.file()) {
                    self.handle_tree_action(action);
                }
            }
            WorkPane::Diff => self.diff.show(ui),
            WorkPane::Services => {
                if let Some(action) = ServiceView::show(ui, &self.services, &self.tail) {
                    self.handle_service_action(action);
                }
            }
        }
    }
}

impl eframe::App for AgentDeckApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        while let Ok(message) = self.receiver.try_recv() {
            self.handle_message(message);
        }
        self.drive_tree_loads();

        egui::TopBottomPanel::top("title_bar_panel").show(ctx, |ui| {
            if let Some(TitleBarAction::RefreshAll) = TitleBar::show(
                ui,
                DEFAULT_WINDOW_TITLE,
                self.client.base_url(),
                self.board.selected(),
            ) {
                self.refresh_directory();
                self.request_session_data();
            }
        });

        egui::SidePanel::left("session_panel")
            .resizable(true)
            .default_width(220.0)
            .show(ctx, |ui| {
                if let Some(action) =
                    self.session_panel
                        .show(ui, &self.board, &self.workspaces, &self.agents)
                {
                    self.handle_session_action(action);
                }
            });

        egui::SidePanel::right("work_panel")
            .resizable(true)
            .default_width(520.0)
            .show(ctx, |ui| {
                self.show_work_panel(ui);
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            let can_send = self
                .board
                .selected_status()
                .is_some_and(|status| status.is_ready());
            if let Some(ChatAction::Submit(prompt)) = self.chat.show(ui, can_send)
                && let Some(session_id) = self.board.selected_id()
            {
                let message = ChatMessage::local_user(&prompt);
                self.client
                    .send_prompt(session_id, &message, self.sender.clone());
            }
        });

        // Background threads report over the channel; poll for them even
        // when the user is idle.
        ctx.request_repaint_after(Duration::from_millis(250));
    }

    fn on_exit(&mut self, _gl: Option<&eframe::glow::Context>) {
        if let Err(e) = self.config.save() {
            tracing::error!("Failed to save settings on exit: {}", e);
        }
    }
}
