use kodegen_tools_rendercrawl::{IdentityField, IdentityTemplate, RANDOM_USER_AGENT_PATTERN};
use regex::Regex;

#[test]
fn test_default_identity_stays_in_ranges() {
    let template = IdentityTemplate::default();
    let shape = Regex::new(
        r"^Mozilla/5\.(\d+) \(Macintosh; Intel Mac OS X 10\.(\d+); rv:(\d+)\.0\) Gecko/(\d{8}) Firefox/(\d+)\.0$",
    )
    .unwrap();

    for _ in 0..1000 {
        let identity = template.generate();
        let caps = shape
            .captures(&identity)
            .unwrap_or_else(|| panic!("unexpected identity {identity}"));

        let mozilla_minor: u32 = caps[1].parse().unwrap();
        let macos_minor: u32 = caps[2].parse().unwrap();
        let rv: u32 = caps[3].parse().unwrap();
        let gecko_year: u32 = caps[4][..4].parse().unwrap();
        let firefox: u32 = caps[5].parse().unwrap();

        assert!(mozilla_minor < 10);
        assert!((15..20).contains(&macos_minor));
        assert!((100..200).contains(&rv));
        assert!((2010..=2024).contains(&gecko_year));
        assert!((100..200).contains(&firefox));
    }
}

#[test]
fn test_custom_template_generates_fixed_fields() {
    let template = IdentityTemplate::new(
        "RenderCrawl/{} ({})",
        vec![
            IdentityField::fixed_major(2, 0, 1),
            IdentityField::Fixed("linux".to_string()),
        ],
    )
    .unwrap();

    assert_eq!(template.generate(), "RenderCrawl/2.0 (linux)");
}

#[test]
fn test_default_pattern_has_five_placeholders() {
    assert_eq!(RANDOM_USER_AGENT_PATTERN.matches("{}").count(), 5);
    assert_eq!(IdentityTemplate::default().fields().len(), 5);
}
