#![forbid(unsafe_code)]

//! End-to-end interaction flows through [`InterstitialPage`] with a
//! recording host controller.

use std::cell::RefCell;
use std::rc::Rc;

use warnpage_core::{Affordance, Command, LoadTimeData};
use warnpage_runtime::{
    HostBinding, HostChannel, HostController, InterstitialPage, PageConfig, PanelVisibility,
    Viewport,
};

#[derive(Clone, Default)]
struct Host(Rc<RefCell<Vec<&'static str>>>);

impl Host {
    fn push(&self, name: &'static str) {
        self.0.borrow_mut().push(name);
    }

    fn calls(&self) -> Vec<&'static str> {
        self.0.borrow().clone()
    }
}

impl HostController for Host {
    fn not_proceed(&self) {
        self.push("notProceed");
    }
    fn proceed(&self) {
        self.push("proceed");
    }
    fn show_more_section(&self) {
        self.push("showMoreSection");
    }
    fn open_help_center(&self) {
        self.push("openHelpCenter");
    }
    fn open_diagnostic(&self) {
        self.push("openDiagnostic");
    }
    fn reload(&self) {
        self.push("reload");
    }
    fn open_date_settings(&self) {
        self.push("openDateSettings");
    }
    fn open_login(&self) {
        self.push("openLogin");
    }
    fn do_report(&self) {
        self.push("doReport");
    }
    fn dont_report(&self) {
        self.push("dontReport");
    }
    fn open_reporting_privacy(&self) {
        self.push("openReportingPrivacy");
    }
    fn open_whitepaper(&self) {
        self.push("openWhitepaper");
    }
    fn report_phishing_error(&self) {
        self.push("reportPhishingError");
    }
    fn open_enhanced_protection_settings(&self) {
        self.push("openEnhancedProtectionSettings");
    }
}

#[derive(Clone, Default)]
struct Ids(Rc<RefCell<Vec<i32>>>);

impl HostChannel for Ids {
    fn send(&self, command_id: i32) {
        self.0.borrow_mut().push(command_id);
    }
}

const SSL_PAGE: &str = r#"{
    "type": "SSL",
    "overridable": true,
    "bad_clock": false,
    "hide_primary_button": false,
    "show_recurrent_error_paragraph": false,
    "errorCode": "NET::ERR_CERT_AUTHORITY_INVALID",
    "openDetails": "Advanced",
    "closeDetails": "Hide advanced",
    "subject": "bank.example",
    "issuer": "Untrusted Root",
    "expirationDate": "2027-03-01",
    "currentDate": "2026-10-18",
    "pem": "-----BEGIN CERTIFICATE-----"
}"#;

fn load(json: &str) -> LoadTimeData {
    let mut data = LoadTimeData::new();
    data.set_data_json(json).unwrap();
    data
}

fn ssl_page() -> (InterstitialPage, Host) {
    let host = Host::default();
    let binding = HostBinding::resolve(Some(Box::new(host.clone())), Box::new(Ids::default()));
    let page = InterstitialPage::new(&load(SSL_PAGE), binding, &PageConfig::default()).unwrap();
    (page, host)
}

#[test]
fn user_reads_details_then_proceeds() {
    let (mut page, host) = ssl_page();

    assert_eq!(page.click(Affordance::DetailsButton), Some(Command::ShowMoreSection));
    assert_eq!(page.click(Affordance::ProceedLink), Some(Command::Proceed));

    assert_eq!(host.calls(), ["showMoreSection", "proceed"]);
}

#[test]
fn user_goes_back() {
    let (mut page, host) = ssl_page();
    assert_eq!(page.click(Affordance::PrimaryButton), Some(Command::NotProceed));
    assert_eq!(host.calls(), ["notProceed"]);
}

#[test]
fn typing_the_bypass_phrase_proceeds_on_any_page() {
    let (mut page, host) = ssl_page();
    for c in "thisisunsafe".chars() {
        page.key_press(c as u32);
    }
    assert_eq!(host.calls(), ["proceed"]);
}

#[test]
fn rotating_a_phone_keeps_details_open() {
    let (mut page, _) = ssl_page();
    assert!(page.toggle_details().is_some());

    // Portrait phone: compact, details replace the main content.
    let panels = page.viewport_changed(Viewport::new(390, 844)).unwrap();
    assert_eq!(
        panels,
        PanelVisibility {
            main_content: false,
            details: true
        }
    );

    // Landscape phone is still compact.
    assert!(page.viewport_changed(Viewport::new(844, 390)).is_none());

    // Desktop: both visible.
    let panels = page.viewport_changed(Viewport::new(1440, 900)).unwrap();
    assert!(panels.main_content && panels.details);
    assert_eq!(page.layout().swaps(), 2);
}

#[test]
fn certificate_panel_lists_config_values() {
    let (mut page, host) = ssl_page();
    assert_eq!(page.click_error_code(), Some(true));
    let info = page.debugging().unwrap();
    assert_eq!(info.fields()[0].value, "bank.example");
    assert_eq!(info.fields()[2].value, "2027-03-01");
    assert!(host.calls().is_empty());
}

#[test]
fn captive_portal_over_channel() {
    let ids = Ids::default();
    let data = load(
        r#"{"type": "CAPTIVE_PORTAL", "overridable": false,
            "hide_primary_button": false, "show_recurrent_error_paragraph": false}"#,
    );
    let mut page = InterstitialPage::new(
        &data,
        HostBinding::resolve(None, Box::new(ids.clone())),
        &PageConfig::default(),
    )
    .unwrap();

    assert_eq!(page.click(Affordance::PrimaryButton), Some(Command::OpenLogin));
    assert_eq!(page.click(Affordance::DetailsButton), None);
    assert_eq!(page.click(Affordance::ProceedLink), None);
    assert_eq!(*ids.0.borrow(), vec![7]);
}

#[test]
fn lookalike_offers_both_buttons() {
    let ids = Ids::default();
    let data = load(
        r#"{"type": "LOOKALIKE", "overridable": true,
            "hide_primary_button": false, "show_recurrent_error_paragraph": false}"#,
    );
    let mut page =
        InterstitialPage::new(&data, HostBinding::Channel(Box::new(ids.clone())), &PageConfig::default())
            .unwrap();

    page.click(Affordance::DontProceedLink);
    page.click(Affordance::ProceedButton);
    assert_eq!(*ids.0.borrow(), vec![0, 1]);
}
