use leptos::prelude::*;

/// Animated SVG arc shown while execution logs load.
/// Sizes: "sm" (16px), "md" (24px), "lg" (32px)
#[component]
pub fn Spinner(
    #[prop(default = "md")] size: &'static str,
    #[prop(optional, into)] label: Option<String>,
) -> impl IntoView {
    let px = match size {
        "sm" => 16,
        "lg" => 32,
        _ => 24,
    };
    let svg = format!(
        r##"<svg width="{px}" height="{px}" viewBox="0 0 24 24" xmlns="http://www.w3.org/2000/svg" class="svg-spinner">
  <circle cx="12" cy="12" r="10" fill="none" stroke="rgba(49,130,206,0.15)" stroke-width="2.5"/>
  <path d="M12 2a10 10 0 0 1 10 10" fill="none" stroke="#3182ce" stroke-width="2.5" stroke-linecap="round">
    <animateTransform attributeName="transform" type="rotate" from="0 12 12" to="360 12 12" dur="0.9s" repeatCount="indefinite"/>
  </path>
</svg>"##
    );
    let aria_label = label.clone().unwrap_or_else(|| "Loading".to_string());
    let container_class = format!("spinner-container spinner-container-{size}");
    view! {
        <div class=container_class role="status" aria-label=aria_label>
            <span class="svg-spinner-wrap" inner_html=svg></span>
            {label.map(|text| view! { <span class="spinner-label">{text}</span> })}
        </div>
    }
}
