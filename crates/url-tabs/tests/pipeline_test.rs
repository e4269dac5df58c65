#![allow(clippy::unwrap_used, clippy::expect_used)]
//! Render pipeline tests over host-shaped block JSON.

use serde_json::Value;
use url_tabs::block::ParsedBlock;
use url_tabs::endpoint::{EndpointMask, EndpointRegistry};
use url_tabs::filter::RenderPipeline;
use url_tabs::request::RequestContext;
use url_tabs_test_utils::{
    assert, group, navigation, paragraph, plain_link, product_tabs, tab_link,
};

fn blocks(values: Vec<Value>) -> Vec<ParsedBlock> {
    values
        .into_iter()
        .map(|v| serde_json::from_value(v).unwrap())
        .collect()
}

fn render(values: Vec<Value>, uri: &str) -> String {
    let ctx = RequestContext::new(uri, EndpointRegistry::default());
    RenderPipeline::default().render_html(&blocks(values), &ctx)
}

#[test]
fn test_navigation_marks_active_tab() {
    let html = render(vec![navigation(&product_tabs())], "/products/tab/specs/");

    assert::contains(
        &html,
        "<li class=\"wp-block-navigation-item current-menu-item\">\
         <a class=\"wp-block-navigation-item__content hm-url-tab-link is-active\" \
         href=\"/products/tab/specs/\"><span>Specs</span></a></li>",
    );
    assert::contains(&html, "href=\"/products/\"");
    assert::contains(&html, "href=\"/products/tab/\"");
    assert::contains(&html, "href=\"/products/tab/reviews/\"");
    assert::occurs(&html, "current-menu-item", 1);
    assert::occurs(&html, "is-active", 1);
    assert::occurs(&html, "hm-url-tab-link", 4);
}

#[test]
fn test_navigation_order_is_preserved() {
    let html = render(vec![navigation(&product_tabs())], "/products/");
    let home = html.find("Overview").unwrap();
    let base = html.find(">All<").unwrap();
    let specs = html.find(">Specs<").unwrap();
    let reviews = html.find(">reviews<").unwrap();
    assert!(home < base && base < specs && specs < reviews);
    assert!(html.starts_with("<ul class=\"wp-block-navigation__container\">"));
    assert!(html.ends_with("</ul>"));
}

#[test]
fn test_home_tab_active_on_base_page() {
    let html = render(vec![navigation(&product_tabs())], "/products");
    assert::contains(
        &html,
        "<li class=\"wp-block-navigation-item current-menu-item\">\
         <a class=\"wp-block-navigation-item__content hm-url-tab-link is-active\" \
         href=\"/products/\"><span>Overview</span></a></li>",
    );
    assert::occurs(&html, "is-active", 1);
}

#[test]
fn test_plain_links_untouched() {
    let html = render(
        vec![navigation(&[plain_link("/about/", "About")])],
        "/products/tab/specs/",
    );
    assert::contains(&html, "href=\"/about/\"");
    assert::not_contains(&html, "hm-url-tab-link");
    assert::not_contains(&html, "current-menu-item");
}

#[test]
fn test_content_visibility_per_tab() {
    let page = || {
        vec![
            navigation(&product_tabs()),
            paragraph("Intro").with_visibility("no-endpoint", "tab", "").parsed(),
            paragraph("All specs").with_visibility("endpoint-empty", "tab", "").parsed(),
            paragraph("Spec sheet").with_visibility("specific-tab", "tab", "Specs").parsed(),
            paragraph("Footer").parsed(),
        ]
    };

    let home = render(page(), "/products/");
    assert::contains(&home, "<p data-hm-tab-visibility=\"tab\">Intro</p>");
    assert::not_contains(&home, "All specs");
    assert::not_contains(&home, "Spec sheet");
    assert::contains(&home, "<p>Footer</p>");

    let base = render(page(), "/products/tab/");
    assert::not_contains(&base, "Intro");
    assert::contains(&base, "All specs");
    assert::not_contains(&base, "Spec sheet");

    let specs = render(page(), "/products/tab/specs/");
    assert::not_contains(&specs, "Intro");
    assert::not_contains(&specs, "All specs");
    assert::contains(&specs, "<p data-hm-tab-visibility=\"tab\">Spec sheet</p>");
    assert::contains(&specs, "<p>Footer</p>");
}

#[test]
fn test_hidden_group_removes_inner_blocks() {
    let section = group(vec![paragraph("Inside")])
        .with_visibility("specific-tab", "tab", "reviews")
        .parsed();

    let html = render(vec![section.clone()], "/products/tab/reviews/");
    assert_eq!(
        html,
        "<div data-hm-tab-visibility=\"tab\"><p>Inside</p></div>"
    );

    let html = render(vec![section], "/products/tab/specs/");
    assert_eq!(html, "");
}

#[test]
fn test_unknown_condition_renders_unchanged() {
    let html = render(
        vec![paragraph("Shown").with_visibility("bogus", "tab", "").parsed()],
        "/products/tab/x/",
    );
    assert_eq!(html, "<p>Shown</p>");
}

#[test]
fn test_multiple_endpoints_page() {
    let registry = EndpointRegistry::builder()
        .endpoint("overview", EndpointMask::CATEGORIES)
        .build()
        .unwrap();
    let ctx = RequestContext::new("/cat/overview/summary/", registry);

    let page = blocks(vec![
        navigation(&[
            tab_link("tab-home", "tab", "").with_label("Home"),
            tab_link("tab", "overview", "Summary"),
        ]),
        paragraph("No tabs").with_visibility("no-endpoint", "tab", "").parsed(),
        paragraph("Summary body")
            .with_visibility("specific-tab", "overview", "summary")
            .parsed(),
    ]);
    let html = RenderPipeline::default().render_html(&page, &ctx);

    assert::contains(&html, "href=\"/cat/\"");
    assert::contains(
        &html,
        "class=\"wp-block-navigation-item__content hm-url-tab-link is-active\" \
         href=\"/cat/overview/summary/\"",
    );
    assert::not_contains(&html, "No tabs");
    assert::contains(&html, "<p data-hm-tab-visibility=\"overview\">Summary body</p>");
}

#[test]
fn test_visibility_attribute_on_navigation_link_is_ignored() {
    let link = tab_link("tab", "tab", "specs")
        .with_label("Specs")
        .with_attr(
            "hmUrlTabVisibility",
            serde_json::json!({ "condition": "no-endpoint" }),
        );
    let html = render(vec![navigation(&[link])], "/products/tab/specs/");
    assert::contains(&html, ">Specs<");
    assert::not_contains(&html, "data-hm-tab-visibility");
}
