//! Scripted run of the globe against the simulated engine.

use anyhow::{Result, bail};
use feed::LocationRecord;
use foundation::camera::CameraPose;
use globe::config::GlobeConfig;
use globe::scene::{GlobeScene, drive};
use globe::{MapEngine, SimulatedEngine};
use runtime::event_bus::Event;

#[derive(Debug, Clone, Default)]
pub struct SimulateOptions {
    /// Settle events delivered per phase.
    pub steps: usize,
    /// Marker to click once the first phase has run.
    pub click: Option<usize>,
    /// Fly home after the click phase.
    pub home: bool,
}

#[derive(Debug, Clone)]
pub struct SimulationReport {
    pub camera: CameraPose,
    pub eases: usize,
    pub flights: usize,
    pub settles: usize,
    pub loading_visible: bool,
    pub events: Vec<Event>,
}

pub fn run(
    cfg: &GlobeConfig,
    records: Vec<LocationRecord>,
    opts: &SimulateOptions,
) -> Result<SimulationReport> {
    let home = cfg.home;
    let mut engine = SimulatedEngine::new(CameraPose::new(home.center, home.zoom, home.pitch));
    let mut scene = GlobeScene::new(cfg);

    let loaded = engine.load_style();
    let now = engine.now();
    scene.on_event(&loaded, &mut engine, now);
    scene.set_locations(records, &mut engine);

    let mut settles = drive(&mut scene, &mut engine, opts.steps);

    if let Some(index) = opts.click {
        let Some(click) = engine.click_marker(index) else {
            bail!(
                "no marker at index {index} ({} records)",
                scene.records().len()
            );
        };
        let now = engine.now();
        scene.on_event(&click, &mut engine, now);
        settles += drive(&mut scene, &mut engine, opts.steps);
    }

    if opts.home {
        scene.go_home(&mut engine);
        settles += drive(&mut scene, &mut engine, opts.steps);
    }

    // Whatever remains of the overlay delay has passed by the time we report.
    engine.advance(cfg.loading_hide_delay_ms);
    scene.tick(engine.now());

    Ok(SimulationReport {
        camera: engine.camera(),
        eases: engine.ease_count(),
        flights: engine.fly_requests().len(),
        settles,
        loading_visible: scene.is_loading_visible(),
        events: scene.controller().trace().events().to_vec(),
    })
}

#[cfg(test)]
mod tests {
    use super::{SimulateOptions, run};
    use feed::LocationRecord;
    use foundation::geo::LngLat;
    use globe::config::GlobeConfig;
    use pretty_assertions::assert_eq;

    fn records() -> Vec<LocationRecord> {
        [("A", 10.0, 20.0), ("B", 30.0, 40.0)]
            .into_iter()
            .map(|(name, lng, lat)| LocationRecord {
                name: name.into(),
                description: String::new(),
                image: String::new(),
                latitude: lat,
                longitude: lng,
            })
            .collect()
    }

    #[test]
    fn idle_run_spins_west() {
        let cfg = GlobeConfig::default();
        let opts = SimulateOptions {
            steps: 4,
            ..SimulateOptions::default()
        };
        let report = run(&cfg, records(), &opts).unwrap();
        assert_eq!(report.settles, 4);
        assert_eq!(report.eases, 5);
        assert_eq!(report.flights, 0);
        assert!(!report.loading_visible);
        let expected = cfg.home.center.lng - 2.0;
        assert!((report.camera.center.lng - expected).abs() < 1e-9);
    }

    #[test]
    fn click_lands_on_record_and_stays_still() {
        let opts = SimulateOptions {
            steps: 3,
            click: Some(0),
            home: false,
        };
        let report = run(&GlobeConfig::default(), records(), &opts).unwrap();
        assert_eq!(report.flights, 1);
        assert_eq!(report.camera.center, LngLat::new(10.0, 20.0));
        assert_eq!(report.camera.zoom, 14.0);
        // Three spin settles, then the interrupted ease and the landing.
        assert_eq!(report.settles, 5);
        assert_eq!(report.eases, 4);
    }

    #[test]
    fn home_after_click_resumes_spin() {
        let opts = SimulateOptions {
            steps: 2,
            click: Some(1),
            home: true,
        };
        let report = run(&GlobeConfig::default(), records(), &opts).unwrap();
        assert_eq!(report.flights, 2);
        assert_eq!(report.camera.zoom, 1.5);
        assert!(report.events.iter().any(|e| e.message.starts_with("landed") && e.message.contains("Home")));
    }

    #[test]
    fn click_on_missing_marker_fails() {
        let opts = SimulateOptions {
            steps: 1,
            click: Some(7),
            home: false,
        };
        let err = run(&GlobeConfig::default(), records(), &opts).unwrap_err();
        assert!(err.to_string().contains("no marker at index 7"));
    }

    #[test]
    fn empty_feed_leaves_globe_still() {
        let opts = SimulateOptions {
            steps: 5,
            ..SimulateOptions::default()
        };
        let report = run(&GlobeConfig::default(), Vec::new(), &opts).unwrap();
        assert_eq!(report.eases, 0);
        assert_eq!(report.settles, 0);
    }
}
