use fltk::{
    app,
    button::Button,
    enums::{Align, CallbackTrigger, Event, Font, FrameType},
    frame::Frame,
    group::{Flex, FlexType, Group, Pack, PackType, Scroll, ScrollType},
    input::Input,
    prelude::*,
    window::Window,
};
use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

use crate::chat::{AssistantBackend, BackendError, ChatLog, ChatMessage};
use crate::content::Segment;
use crate::ui::constants::*;
use crate::ui::font_settings::TranscriptFonts;
use crate::ui::message_view::MessageView;
use crate::ui::theme;

const WINDOW_TITLE: &str = "Text-to-SQL Agent";
const STATUS_READY: &str = "Ready";

type Reply = Result<String, BackendError>;

/// Whether the send action is available for the given input.
pub fn send_enabled(input: &str, loading: bool) -> bool {
    !loading && !input.trim().is_empty()
}

/// Status bar text once a reply has been shown.
pub fn ready_status(visible_messages: usize) -> String {
    match visible_messages {
        1 => format!("{STATUS_READY} (1 message)"),
        n => format!("{STATUS_READY} ({n} messages)"),
    }
}

pub fn send_label(loading: bool) -> &'static str {
    if loading {
        "Loading..."
    } else {
        "Send"
    }
}

struct ChatState {
    log: ChatLog,
    loading: bool,
    content_height: i32,
}

#[derive(Clone)]
struct ChatWidgets {
    scroll: Scroll,
    pack: Pack,
    input: Input,
    send_btn: Button,
    status: Frame,
}

impl ChatWidgets {
    fn refresh_controls(&mut self, loading: bool) {
        if loading {
            self.input.deactivate();
        } else {
            self.input.activate();
        }
        self.send_btn.set_label(send_label(loading));
        if send_enabled(&self.input.value(), loading) {
            self.send_btn.activate();
        } else {
            self.send_btn.deactivate();
        }
        self.send_btn.redraw();
    }

    fn set_status(&mut self, text: &str) {
        self.status.set_label(text);
        self.status.redraw();
    }

    fn transcript_width(&self) -> i32 {
        (self.scroll.w() - SCROLLBAR_ALLOWANCE).max(200)
    }
}

pub struct ChatWindow {
    window: Window,
}

impl ChatWindow {
    /// Builds the chat window. A missing backend leaves the window usable but unable to send.
    pub fn new(
        width: i32,
        height: i32,
        backend: Result<Box<dyn AssistantBackend>, BackendError>,
        system_prompt: &str,
        fonts: TranscriptFonts,
    ) -> Self {
        let mut window = Window::default()
            .with_size(width, height)
            .with_label(WINDOW_TITLE);
        window.set_color(theme::window_bg());
        window.make_resizable(true);

        let mut main_flex = Flex::default_fill();
        main_flex.set_type(FlexType::Column);
        main_flex.set_margin(WINDOW_MARGIN);
        main_flex.set_spacing(WINDOW_MARGIN);

        let mut header = Frame::default().with_label(WINDOW_TITLE);
        header.set_frame(FrameType::FlatBox);
        header.set_color(theme::panel_bg());
        header.set_label_color(theme::text_primary());
        header.set_label_font(Font::HelveticaBold);
        header.set_label_size(18);
        main_flex.fixed(&header, HEADER_HEIGHT);

        let mut scroll = Scroll::default();
        scroll.set_type(ScrollType::Vertical);
        scroll.set_frame(FrameType::FlatBox);
        scroll.set_color(theme::panel_alt());
        let mut pack = Pack::default().with_size(width - 2 * WINDOW_MARGIN - SCROLLBAR_ALLOWANCE, 0);
        pack.set_type(PackType::Vertical);
        pack.set_spacing(MESSAGE_SPACING);
        pack.end();
        scroll.end();

        let mut input_row = Flex::default();
        input_row.set_type(FlexType::Row);
        input_row.set_spacing(WINDOW_MARGIN);
        let mut input = Input::default();
        input.set_color(theme::input_bg());
        input.set_text_color(theme::text_primary());
        input.set_selection_color(theme::selection_strong());
        input.set_tooltip("Ask for a query, then press Enter");
        let mut send_btn = Button::default().with_label(send_label(false));
        send_btn.set_color(theme::accent());
        send_btn.set_label_color(theme::text_primary());
        send_btn.set_frame(FrameType::RFlatBox);
        input_row.fixed(&send_btn, BUTTON_WIDTH);
        input_row.end();
        main_flex.fixed(&input_row, INPUT_ROW_HEIGHT);

        let mut status = Frame::default().with_label(STATUS_READY);
        status.set_frame(FrameType::FlatBox);
        status.set_color(theme::panel_bg());
        status.set_label_color(theme::text_muted());
        status.set_label_size(12);
        status.set_align(Align::Left | Align::Inside);
        main_flex.fixed(&status, STATUS_BAR_HEIGHT);

        main_flex.end();
        window.end();

        let mut widgets = ChatWidgets {
            scroll,
            pack,
            input,
            send_btn,
            status,
        };
        let state = Rc::new(RefCell::new(ChatState {
            log: ChatLog::with_system_prompt(system_prompt),
            loading: false,
            content_height: 0,
        }));

        let backend: Option<Arc<dyn AssistantBackend>> = match backend {
            Ok(backend) => Some(Arc::from(backend)),
            Err(err) => {
                warn!(error = %err, "assistant backend unavailable");
                widgets.set_status(&err.to_string());
                None
            }
        };

        widgets.refresh_controls(false);
        Self::wire_events(&widgets, &state, backend, fonts);

        Self { window }
    }

    fn wire_events(
        widgets: &ChatWidgets,
        state: &Rc<RefCell<ChatState>>,
        backend: Option<Arc<dyn AssistantBackend>>,
        fonts: TranscriptFonts,
    ) {
        let send_action: Rc<dyn Fn()> = {
            let widgets = widgets.clone();
            let state = state.clone();
            Rc::new(move || submit(&widgets, &state, backend.as_ref(), fonts))
        };

        let mut input = widgets.input.clone();
        input.set_trigger(CallbackTrigger::EnterKeyAlways);
        let on_enter = send_action.clone();
        input.set_callback(move |_| on_enter());

        let mut key_widgets = widgets.clone();
        let key_state = state.clone();
        input.handle(move |_, ev| {
            if matches!(ev, Event::KeyUp | Event::Paste) {
                let loading = key_state.borrow().loading;
                key_widgets.refresh_controls(loading);
            }
            false
        });

        let mut send_btn = widgets.send_btn.clone();
        send_btn.set_callback(move |_| send_action());
    }

    pub fn show(&mut self) {
        self.window.show();
    }
}

fn submit(
    widgets: &ChatWidgets,
    state: &Rc<RefCell<ChatState>>,
    backend: Option<&Arc<dyn AssistantBackend>>,
    fonts: TranscriptFonts,
) {
    let mut widgets = widgets.clone();
    let text = widgets.input.value();
    if !send_enabled(&text, state.borrow().loading) {
        return;
    }
    let Some(backend) = backend else {
        widgets.set_status("No assistant backend configured");
        return;
    };

    let (message, history) = {
        let mut state = state.borrow_mut();
        let Some(message) = state.log.push_user(&text).cloned() else {
            return;
        };
        state.loading = true;
        (message, state.log.messages().to_vec())
    };
    append_message(&mut widgets, state, &message, fonts);
    widgets.input.set_value("");
    widgets.refresh_controls(true);
    widgets.set_status("Waiting for the assistant...");
    info!(messages = history.len(), "sending chat history");

    let (sender, receiver) = mpsc::channel::<Reply>();
    let backend = Arc::clone(backend);
    thread::spawn(move || {
        let reply = backend.send_message(&history);
        if sender.send(reply).is_err() {
            debug!("chat window closed before the assistant replied");
        }
        app::awake();
    });

    schedule_poll(Rc::new(receiver), widgets, state.clone(), fonts);
}

fn schedule_poll(
    receiver: Rc<Receiver<Reply>>,
    mut widgets: ChatWidgets,
    state: Rc<RefCell<ChatState>>,
    fonts: TranscriptFonts,
) {
    match receiver.try_recv() {
        Ok(Ok(reply)) => {
            let (message, shown) = {
                let mut state = state.borrow_mut();
                state.loading = false;
                let message = state.log.push_assistant(&reply).clone();
                (message, state.log.visible().count())
            };
            let segments = message.segments();
            debug!(
                segments = segments.len(),
                sql_blocks = segments.iter().filter(|s| s.is_sql()).count(),
                has_result = segments.iter().any(Segment::is_result),
                "assistant reply parsed"
            );
            append_message(&mut widgets, &state, &message, fonts);
            widgets.refresh_controls(false);
            widgets.set_status(&ready_status(shown));
        }
        Ok(Err(err)) => {
            warn!(error = %err, "assistant request failed");
            finish_with_status(&mut widgets, &state, &format!("Error: {err}"));
        }
        Err(TryRecvError::Disconnected) => {
            warn!("assistant worker exited without a reply");
            finish_with_status(&mut widgets, &state, "Error: assistant worker stopped");
        }
        Err(TryRecvError::Empty) => {
            app::add_timeout3(0.05, move |_| {
                schedule_poll(
                    Rc::clone(&receiver),
                    widgets.clone(),
                    Rc::clone(&state),
                    fonts,
                );
            });
        }
    }
}

fn finish_with_status(widgets: &mut ChatWidgets, state: &Rc<RefCell<ChatState>>, status: &str) {
    state.borrow_mut().loading = false;
    widgets.refresh_controls(false);
    widgets.set_status(status);
}

/// Adds a message view to the transcript and scrolls it into view.
fn append_message(
    widgets: &mut ChatWidgets,
    state: &Rc<RefCell<ChatState>>,
    message: &ChatMessage,
    fonts: TranscriptFonts,
) {
    let width = widgets.transcript_width();
    Group::set_current(None::<&Group>);
    let view = MessageView::build(message, width, &fonts);
    widgets.pack.add(&view.get_widget());

    let content_height = {
        let mut state = state.borrow_mut();
        if state.content_height > 0 {
            state.content_height += MESSAGE_SPACING;
        }
        state.content_height += view.height();
        state.content_height
    };

    let (x, y) = (widgets.scroll.x(), widgets.scroll.y());
    widgets.pack.resize(x, y, width, content_height);
    let offset = (content_height - widgets.scroll.h()).max(0);
    widgets.scroll.scroll_to(0, offset);
    widgets.scroll.redraw();
}
