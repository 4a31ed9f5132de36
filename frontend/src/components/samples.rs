//! Sample gallery: click a bundled document to upload it.

use leptos::*;
use web_sys::File;

use crate::services::{fetch_sample, load_sample, sample_file_name, HttpClassifier, UploadSession};
use crate::SAMPLE_IMAGES;

#[component]
pub fn SampleGallery(session: RwSignal<UploadSession<File>>) -> impl IntoView {
    let on_sample_click = move |path: &'static str| {
        spawn_local(async move {
            let classifier = HttpClassifier::default();
            if let Err(e) = load_sample(&session, &classifier, path, fetch_sample(path)).await {
                log::error!("Error loading sample image: {}", e);
            }
        });
    };

    view! {
        <div class="card sample-card">
            <div class="card-header">
                <h2 class="card-title">"Sample"</h2>
            </div>
            <div class="card-content">
                <div class="sample-grid">
                    {SAMPLE_IMAGES
                        .into_iter()
                        .map(|path| {
                            let alt = format!("Sample {}", sample_file_name(path));
                            view! {
                                <div class="sample-tile" on:click=move |_| on_sample_click(path)>
                                    <img src=path alt=alt class="sample-image"/>
                                </div>
                            }
                        })
                        .collect_view()}
                </div>
            </div>
        </div>
    }
}
