//! Document upload card with drag & drop support.
//!
//! Accepted files are queued on the session and uploaded one by one;
//! anything that is not a JPG, JPEG or PNG is skipped with a notice.

use leptos::*;
use web_sys::{DragEvent, Event, File, FileList, HtmlInputElement};

use crate::services::{partition_accepted, submit_batch, HttpClassifier, UploadSession};
use crate::ACCEPTED_EXTENSIONS;

/// Queue files on the session and start their sequential upload.
pub(crate) fn start_upload(session: RwSignal<UploadSession<File>>, files: Vec<File>) {
    if files.is_empty() {
        return;
    }

    spawn_local(async move {
        let classifier = HttpClassifier::default();
        let ids = submit_batch(&session, &classifier, files).await;
        log::debug!("Batch of {} finished", ids.len());
    });
}

/// Nesting depth of `dragenter` over `dragleave`.
///
/// Moving between child elements of the drop zone fires a leave for the old
/// child after the enter for the new one, so the overlay is driven by the
/// depth rather than by the last event.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
struct DragDepth(u32);

impl DragDepth {
    fn enter(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    fn leave(self) -> Self {
        Self(self.0.saturating_sub(1))
    }

    fn is_active(self) -> bool {
        self.0 > 0
    }
}

fn collect_files(list: Option<FileList>) -> Vec<File> {
    list.map(|files| (0..files.length()).filter_map(|i| files.get(i)).collect())
        .unwrap_or_default()
}

#[component]
pub fn UploadSection(session: RwSignal<UploadSession<File>>) -> impl IntoView {
    let (drag_depth, set_drag_depth) = create_signal(DragDepth::default());
    let (notice, set_notice) = create_signal(None::<String>);
    let file_input = create_node_ref::<html::Input>();

    let accept_files = move |files: Vec<File>| {
        let (accepted, rejected) = partition_accepted(files);

        if rejected.is_empty() {
            set_notice.set(None);
        } else {
            for error in &rejected {
                log::warn!("⚠️ Skipping file: {}", error);
            }
            set_notice.set(Some(format!(
                "Skipped {} file(s): only JPG, JPEG and PNG are accepted",
                rejected.len()
            )));
        }

        start_upload(session, accepted);
    };

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        accept_files(collect_files(input.files()));
        // Allow re-selecting the same file.
        input.set_value("");
    };

    // A file dropped anywhere else on the page would make the browser
    // navigate to it.
    let page_dragover = window_event_listener(ev::dragover, |ev| ev.prevent_default());
    let page_drop = window_event_listener(ev::drop, |ev| ev.prevent_default());
    on_cleanup(move || {
        page_dragover.remove();
        page_drop.remove();
    });

    let on_drag_enter = move |ev: DragEvent| {
        ev.prevent_default();
        set_drag_depth.update(|depth| *depth = depth.enter());
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        set_drag_depth.set(DragDepth::default());
        accept_files(collect_files(ev.data_transfer().and_then(|dt| dt.files())));
    };

    let open_picker = move |_| {
        if let Some(input) = file_input.get() {
            input.click();
        }
    };

    view! {
        <div class="card upload-card">
            <div class="card-header">
                <h2 class="card-title">"Upload Documents"</h2>
            </div>
            <div class="card-content">
                <div class="upload-hint">
                    <span class="hint-icon">"ⓘ"</span>
                    <p>"Include personal documents such as passports and driver's licenses"</p>
                </div>

                <div
                    class="upload-section"
                    id="uploadZone"
                    on:dragenter=on_drag_enter
                    on:dragover=|ev: DragEvent| ev.prevent_default()
                    on:dragleave=move |_| set_drag_depth.update(|depth| *depth = depth.leave())
                    on:drop=on_drop
                >
                    <input
                        type="file"
                        id="fileInput"
                        multiple=true
                        accept=".jpg,.jpeg,.png,image/jpeg,image/png"
                        style="display:none"
                        node_ref=file_input
                        on:change=on_file_change
                    />
                    <div class="upload-icon">"📤"</div>
                    <p class="upload-text">"Drag & drop files here, or"</p>
                    <button class="btn btn-primary" on:click=open_picker>
                        "Select Files"
                    </button>

                    <div class="accepted-types">
                        <p class="accepted-title">"Accepted File Types:"</p>
                        <div class="chips">
                            {ACCEPTED_EXTENSIONS
                                .iter()
                                .map(|ext| view! { <span class="chip">{ext.to_uppercase()}</span> })
                                .collect_view()}
                        </div>
                    </div>

                    <Show when=move || notice.get().is_some() fallback=|| view! {}>
                        <div class="error-message">{move || notice.get().unwrap_or_default()}</div>
                    </Show>
                </div>
            </div>

            <Show when=move || drag_depth.get().is_active() fallback=|| view! {}>
                <div class="drop-overlay">
                    <p>"Drop files here ..."</p>
                </div>
            </Show>
        </div>
    }
}
