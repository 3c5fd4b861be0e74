//! Line-oriented front end.
//!
//! Every input line is either a command in the controller's grammar or a
//! `:`-prefixed shell directive that pokes the virtual adapters. Nothing a
//! user types can stop the loop: errors become printed lines.

use smarthome_adapter_virtual::VirtualThermometer;
use smarthome_app::controller::{Outcome, SmartHome};
use smarthome_app::ports::{Scheduler, TemperatureSensor};
use smarthome_domain::error::HomeError;

const HELP: &[&str] = &[
    "commands:",
    "  turnOn(id)  turnOff(id)  viewStatus()",
    "  schedule(id, 'time', 'command')",
    "  addTrigger('type', 'condition', 'action')  removeTrigger('type')",
    "directives:",
    "  :temp <value>   set the virtual temperature",
    "  :check          evaluate every trigger now",
    "  :help",
];

/// Turn the result of a command into the lines to print.
#[must_use]
pub fn render(result: Result<Outcome, HomeError>) -> Vec<String> {
    match result {
        Ok(Outcome::Done) => Vec::new(),
        Ok(Outcome::Status(lines)) => lines,
        Err(HomeError::UnknownCommand(_)) => vec!["Invalid command.".to_string()],
        Err(HomeError::Parse(err)) => vec![format!("Invalid command: {err}")],
        Err(err) => vec![format!("error: {:#}", anyhow::Error::new(err))],
    }
}

/// Handle one input line.
pub fn handle_line<S, C>(
    home: &mut SmartHome<S, C>,
    thermometer: &VirtualThermometer,
    line: &str,
) -> Vec<String>
where
    S: TemperatureSensor,
    C: Scheduler,
{
    let line = line.trim();
    if line.is_empty() {
        return Vec::new();
    }
    let Some(directive) = line.strip_prefix(':') else {
        return render(home.execute(line));
    };

    let mut words = directive.split_whitespace();
    match (words.next(), words.next()) {
        (Some("temp"), Some(value)) => match value.parse::<f64>() {
            Ok(reading) if reading.is_finite() => {
                thermometer.set(reading);
                vec![format!("temperature set to {reading}")]
            }
            _ => vec![format!("error: {value:?} is not a temperature")],
        },
        (Some("temp"), None) => vec![format!("temperature is {}", thermometer.get())],
        (Some("check"), _) => render(home.notify_all().map(|()| Outcome::Done)),
        (Some("help"), _) => HELP.iter().map(ToString::to_string).collect(),
        _ => vec!["Invalid command.".to_string()],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use smarthome_app::ports::ScheduledJob;
    use smarthome_domain::device::DeviceStatus;
    use smarthome_domain::id::DeviceId;

    struct NoScheduler;

    impl Scheduler for NoScheduler {
        fn schedule(&self, _job: ScheduledJob) -> Result<(), HomeError> {
            Ok(())
        }
    }

    fn setup() -> (
        SmartHome<Arc<VirtualThermometer>, NoScheduler>,
        Arc<VirtualThermometer>,
    ) {
        let thermometer = Arc::new(VirtualThermometer::new(20.0));
        let mut home = SmartHome::new(Arc::clone(&thermometer), NoScheduler);
        home.register_device("light", DeviceStatus::On).unwrap();
        home.register_device("lock", DeviceStatus::Off).unwrap();
        (home, thermometer)
    }

    #[test]
    fn should_print_status_lines() {
        let (mut home, thermometer) = setup();
        assert_eq!(
            handle_line(&mut home, &thermometer, "viewStatus()"),
            vec!["light 0 is on.", "lock 1 is off."]
        );
    }

    #[test]
    fn should_print_invalid_command_for_unknown_name() {
        let (mut home, thermometer) = setup();
        assert_eq!(
            handle_line(&mut home, &thermometer, "frobnicate(1)"),
            vec!["Invalid command."]
        );
    }

    #[test]
    fn should_explain_malformed_input() {
        let (mut home, thermometer) = setup();
        let out = handle_line(&mut home, &thermometer, "turnOn(");
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("Invalid command: "));
    }

    #[test]
    fn should_report_missing_device_as_error() {
        let (mut home, thermometer) = setup();
        assert_eq!(
            handle_line(&mut home, &thermometer, "turnOn(5)"),
            vec!["error: Device 5 not found"]
        );
    }

    #[test]
    fn should_ignore_blank_lines() {
        let (mut home, thermometer) = setup();
        assert!(handle_line(&mut home, &thermometer, "   ").is_empty());
    }

    #[test]
    fn should_set_temperature_and_check_triggers() {
        let (mut home, thermometer) = setup();
        handle_line(&mut home, &thermometer, "addTrigger('temperature', '75', 'off')");

        handle_line(&mut home, &thermometer, ":temp 80");
        assert!(home.device(DeviceId::new(0)).unwrap().status.is_on());

        assert!(handle_line(&mut home, &thermometer, ":check").is_empty());
        assert!(!home.device(DeviceId::new(0)).unwrap().status.is_on());
    }

    #[test]
    fn should_reject_non_numeric_temperature() {
        let (mut home, thermometer) = setup();
        let out = handle_line(&mut home, &thermometer, ":temp warm");
        assert_eq!(out, vec!["error: \"warm\" is not a temperature"]);
        assert!((thermometer.get() - 20.0).abs() < f64::EPSILON);
    }

    #[test]
    fn should_render_scheduler_error_with_its_cause() {
        let out = render(Err(HomeError::Scheduler(Box::new(
            smarthome_adapter_virtual::SchedulerError::InvalidTime("soon".to_string()),
        ))));
        assert_eq!(
            out,
            vec!["error: scheduler error: invalid time specification \"soon\""]
        );
    }
}
