//! Breadcrumb header

use leptos::*;
use crate::APP_NAME;

#[component]
pub fn Header() -> impl IntoView {
    view! {
        <header>
            <nav class="breadcrumb" aria-label="breadcrumb">
                <ol class="breadcrumb-list">
                    <li class="breadcrumb-item">
                        <span class="breadcrumb-page">"Fireworks.ai"</span>
                    </li>
                    <li class="breadcrumb-separator" role="presentation">"›"</li>
                    <li class="breadcrumb-item">
                        <span class="breadcrumb-page" aria-current="page">{APP_NAME}</span>
                    </li>
                </ol>
            </nav>
        </header>
    }
}
