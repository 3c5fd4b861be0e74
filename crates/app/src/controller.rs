//! Smart home controller — owns devices and triggers and routes commands.
//!
//! The controller is synchronous and expects a single owner. Anything that
//! submits commands from several tasks must funnel them through one loop.
//!
//! Trigger binding policy: every device has at most one active trigger, and
//! [`SmartHome::add_trigger`] rebinds *all* current devices to the newest
//! one. Older triggers stay in the list but have no observers left.

use smarthome_domain::device::{Device, DeviceStatus};
use smarthome_domain::error::{HomeError, NotFoundError};
use smarthome_domain::id::{DeviceId, TriggerId};
use smarthome_domain::trigger::Trigger;

use crate::command::Command;
use crate::evaluation::Evaluate;
use crate::ports::{ScheduledJob, Scheduler, TemperatureSensor};
use crate::registry::DeviceRegistry;

/// What a successfully dispatched command produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Done,
    /// One `"{type} {id} is {status}."` line per device, in registration order.
    Status(Vec<String>),
}

/// The controller. Sensor and scheduler are injected.
pub struct SmartHome<S, C> {
    registry: DeviceRegistry,
    triggers: Vec<Trigger>,
    sensor: S,
    scheduler: C,
}

impl<S, C> SmartHome<S, C>
where
    S: TemperatureSensor,
    C: Scheduler,
{
    /// Create an empty controller.
    pub fn new(sensor: S, scheduler: C) -> Self {
        Self {
            registry: DeviceRegistry::new(),
            triggers: Vec::new(),
            sensor,
            scheduler,
        }
    }

    #[must_use]
    pub fn registry(&self) -> &DeviceRegistry {
        &self.registry
    }

    /// Triggers in the order they were added.
    #[must_use]
    pub fn triggers(&self) -> &[Trigger] {
        &self.triggers
    }

    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this id.
    pub fn device(&self, id: DeviceId) -> Result<&Device, HomeError> {
        self.registry.get(id)
    }

    /// Register a device under its own id.
    ///
    /// The device starts unbound; it picks up a trigger on the next
    /// [`add_trigger`](Self::add_trigger).
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Validation`] for a blank kind or a taken id.
    #[tracing::instrument(skip(self, device), fields(device_id = %device.id, kind = %device.kind))]
    pub fn add_device(&mut self, mut device: Device) -> Result<DeviceId, HomeError> {
        device.trigger = None;
        self.registry.insert(device)
    }

    /// Register a device under the next free id.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Validation`] for a blank kind.
    #[tracing::instrument(skip(self, kind))]
    pub fn register_device(
        &mut self,
        kind: impl Into<String>,
        status: DeviceStatus,
    ) -> Result<DeviceId, HomeError> {
        self.registry.register(kind, status)
    }

    /// Remove a device and drop it from every observer list.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this id.
    #[tracing::instrument(skip(self))]
    pub fn remove_device(&mut self, id: DeviceId) -> Result<Device, HomeError> {
        let device = self.registry.remove(id)?;
        for trigger in &mut self.triggers {
            while trigger.remove_observer(id) {}
        }
        Ok(device)
    }

    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this id.
    pub fn turn_on(&mut self, id: DeviceId) -> Result<(), HomeError> {
        self.registry.get_mut(id)?.turn_on();
        Ok(())
    }

    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] when no device has this id.
    pub fn turn_off(&mut self, id: DeviceId) -> Result<(), HomeError> {
        self.registry.get_mut(id)?.turn_off();
        Ok(())
    }

    /// Hand `command` to the scheduler for execution at `at`.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] for an unknown device, or whatever the
    /// scheduler reports about `at`.
    #[tracing::instrument(skip(self))]
    pub fn schedule(&mut self, id: DeviceId, at: &str, command: &str) -> Result<(), HomeError> {
        self.registry.get(id)?;
        self.scheduler.schedule(ScheduledJob {
            device: id,
            at: at.to_string(),
            command: command.to_string(),
        })
    }

    /// Run a job handed back by the scheduler through the normal command path.
    ///
    /// # Errors
    ///
    /// Same as [`execute`](Self::execute).
    #[tracing::instrument(skip(self, job), fields(device_id = %job.device, command = %job.command))]
    pub fn fire(&mut self, job: &ScheduledJob) -> Result<Outcome, HomeError> {
        tracing::info!("running scheduled command");
        self.execute(&job.command)
    }

    /// Add a trigger and bind every current device to it.
    ///
    /// Each device is moved off the observer list of its previous trigger,
    /// so only the newest trigger drives devices afterwards.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::Parse`] when a temperature threshold is not a
    /// number.
    #[tracing::instrument(skip(self))]
    pub fn add_trigger(
        &mut self,
        kind: &str,
        condition: &str,
        action: &str,
    ) -> Result<TriggerId, HomeError> {
        let mut trigger = Trigger::from_parts(kind, condition, action)?;

        for device in self.registry.iter_mut() {
            if let Some(previous) = device.trigger.take() {
                if let Some(old) = self.triggers.iter_mut().find(|t| t.id == previous) {
                    while old.remove_observer(device.id) {}
                }
            }
            device.trigger = Some(trigger.id);
            trigger.add_observer(device.id);
        }

        tracing::info!(
            trigger = %trigger.id,
            condition = %trigger.condition,
            reaction = %trigger.reaction,
            observers = trigger.observers().len(),
            "trigger added"
        );
        let id = trigger.id;
        self.triggers.push(trigger);
        Ok(id)
    }

    /// Remove the first trigger of the given kind, then unbind every device.
    ///
    /// Devices are unbound even when nothing matched, and even when they
    /// were bound to a trigger of another kind that stays in the list.
    /// Returns the removed trigger, if any.
    #[tracing::instrument(skip(self))]
    pub fn remove_trigger(&mut self, kind: &str) -> Option<Trigger> {
        let removed = self
            .triggers
            .iter()
            .position(|t| t.kind.name() == kind)
            .map(|index| self.triggers.remove(index));

        for device in self.registry.iter_mut() {
            device.trigger = None;
        }
        for trigger in &mut self.triggers {
            trigger.clear_observers();
        }

        match &removed {
            Some(trigger) => tracing::info!(trigger = %trigger.id, "trigger removed"),
            None => tracing::debug!("no trigger of this kind"),
        }
        removed
    }

    /// Status lines for every device, in registration order.
    #[must_use]
    pub fn view_status(&self) -> Vec<String> {
        self.registry.iter().map(Device::status_line).collect()
    }

    /// Re-check the trigger bound to one device and apply its reaction.
    ///
    /// Returns `true` when the trigger fired.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] for an unknown device, or a sensor
    /// error from evaluation.
    pub fn update_device(&mut self, id: DeviceId) -> Result<bool, HomeError> {
        let Some(bound) = self.registry.get(id)?.trigger else {
            return Ok(false);
        };
        let Some(trigger) = self.triggers.iter().find(|t| t.id == bound) else {
            return Ok(false);
        };
        if !trigger.evaluate(&self.sensor)? {
            return Ok(false);
        }
        let reaction = trigger.reaction;
        let device = self.registry.get_mut(id)?;
        device.apply(reaction);
        tracing::debug!(device_id = %id, %reaction, status = %device.status, "trigger fired");
        Ok(true)
    }

    /// Update every observer of a trigger, in insertion order.
    ///
    /// The first failing observer stops the walk; later observers are not
    /// updated.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::NotFound`] for an unknown trigger, or the first
    /// observer's error.
    pub fn notify_observers(&mut self, trigger: TriggerId) -> Result<(), HomeError> {
        let observers = self
            .triggers
            .iter()
            .find(|t| t.id == trigger)
            .ok_or_else(|| NotFoundError {
                entity: "Trigger",
                id: trigger.to_string(),
            })?
            .observers()
            .to_vec();
        for device in observers {
            self.update_device(device)?;
        }
        Ok(())
    }

    /// Notify the observers of every trigger, oldest trigger first.
    ///
    /// # Errors
    ///
    /// Returns the first observer error.
    pub fn notify_all(&mut self) -> Result<(), HomeError> {
        let ids: Vec<_> = self.triggers.iter().map(|t| t.id).collect();
        for id in ids {
            self.notify_observers(id)?;
        }
        Ok(())
    }

    /// Apply a typed command.
    ///
    /// # Errors
    ///
    /// Returns whatever the targeted operation returns.
    #[tracing::instrument(skip(self, command), fields(command = %command.name()))]
    pub fn dispatch(&mut self, command: Command) -> Result<Outcome, HomeError> {
        tracing::debug!(?command, "dispatching");
        match command {
            Command::TurnOn { device } => self.turn_on(device)?,
            Command::TurnOff { device } => self.turn_off(device)?,
            Command::Schedule {
                device,
                at,
                command,
            } => self.schedule(device, &at, &command)?,
            Command::AddTrigger {
                kind,
                condition,
                action,
            } => {
                self.add_trigger(&kind, &condition, &action)?;
            }
            Command::RemoveTrigger { kind } => {
                self.remove_trigger(&kind);
            }
            Command::ViewStatus => return Ok(Outcome::Status(self.view_status())),
        }
        Ok(Outcome::Done)
    }

    /// Parse a command line and dispatch it.
    ///
    /// Nothing is mutated when parsing fails.
    ///
    /// # Errors
    ///
    /// Returns [`HomeError::UnknownCommand`] for names outside the grammar,
    /// [`HomeError::Parse`] for malformed text, or the dispatch error.
    pub fn execute(&mut self, line: &str) -> Result<Outcome, HomeError> {
        let command = Command::parse(line).inspect_err(|err| {
            tracing::warn!(line, error = %err, "rejected command");
        })?;
        self.dispatch(command)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    use smarthome_domain::error::ParseError;
    use smarthome_domain::trigger::{Reaction, TriggerKind};

    /// Sensor whose reading the test can change between evaluations.
    #[derive(Clone, Default)]
    struct FixedSensor(Rc<Cell<f64>>);

    impl FixedSensor {
        fn set(&self, value: f64) {
            self.0.set(value);
        }
    }

    impl TemperatureSensor for FixedSensor {
        fn temperature(&self) -> Result<f64, HomeError> {
            Ok(self.0.get())
        }
    }

    /// Scheduler that only records what it was given.
    #[derive(Clone, Default)]
    struct RecordingScheduler(Rc<RefCell<Vec<ScheduledJob>>>);

    impl Scheduler for RecordingScheduler {
        fn schedule(&self, job: ScheduledJob) -> Result<(), HomeError> {
            self.0.borrow_mut().push(job);
            Ok(())
        }
    }

    type Home = SmartHome<FixedSensor, RecordingScheduler>;

    fn home_with(kinds: &[&str]) -> (Home, FixedSensor, RecordingScheduler) {
        let sensor = FixedSensor::default();
        let scheduler = RecordingScheduler::default();
        let mut home = SmartHome::new(sensor.clone(), scheduler.clone());
        for kind in kinds {
            home.register_device(*kind, DeviceStatus::On).unwrap();
        }
        (home, sensor, scheduler)
    }

    fn status(home: &Home, id: u32) -> DeviceStatus {
        home.device(DeviceId::new(id)).unwrap().status
    }

    #[test]
    fn should_turn_device_on_and_off_idempotently() {
        let (mut home, _, _) = home_with(&["light"]);
        let id = DeviceId::new(0);
        home.turn_off(id).unwrap();
        home.turn_off(id).unwrap();
        assert_eq!(status(&home, 0), DeviceStatus::Off);
        home.turn_on(id).unwrap();
        home.turn_on(id).unwrap();
        assert_eq!(status(&home, 0), DeviceStatus::On);
    }

    #[test]
    fn should_turn_off_device_when_temperature_reaches_threshold() {
        let (mut home, sensor, _) = home_with(&["heater"]);
        home.add_trigger("temperature", "75", "anything").unwrap();

        sensor.set(80.0);
        assert!(home.update_device(DeviceId::new(0)).unwrap());
        assert_eq!(status(&home, 0), DeviceStatus::Off);
    }

    #[test]
    fn should_leave_device_unchanged_below_threshold() {
        let (mut home, sensor, _) = home_with(&["heater"]);
        home.add_trigger("temperature", "75", "anything").unwrap();

        sensor.set(70.0);
        assert!(!home.update_device(DeviceId::new(0)).unwrap());
        assert_eq!(status(&home, 0), DeviceStatus::On);
    }

    #[test]
    fn should_reread_sensor_on_every_update() {
        let (mut home, sensor, _) = home_with(&["heater"]);
        home.add_trigger("temperature", "75", "off").unwrap();

        sensor.set(70.0);
        home.update_device(DeviceId::new(0)).unwrap();
        assert_eq!(status(&home, 0), DeviceStatus::On);

        sensor.set(76.0);
        home.update_device(DeviceId::new(0)).unwrap();
        assert_eq!(status(&home, 0), DeviceStatus::Off);
    }

    #[test]
    fn should_bind_every_device_to_new_trigger() {
        let (mut home, _, _) = home_with(&["light", "fan", "lock"]);
        let id = home.add_trigger("temperature", "75", "off").unwrap();

        assert!(home.registry().iter().all(|d| d.trigger == Some(id)));
        assert_eq!(
            home.triggers()[0].observers(),
            &[DeviceId::new(0), DeviceId::new(1), DeviceId::new(2)]
        );
    }

    #[test]
    fn should_rebind_all_devices_to_newest_trigger_only() {
        let (mut home, sensor, _) = home_with(&["light", "fan"]);
        let first = home.add_trigger("temperature", "75", "off").unwrap();
        let second = home.add_trigger("occupancy", "hall", "on").unwrap();

        assert!(home.registry().iter().all(|d| d.trigger == Some(second)));
        assert!(home.triggers()[0].observers().is_empty());
        assert_eq!(home.triggers()[1].kind.name(), "occupancy");

        sensor.set(100.0);
        home.notify_observers(first).unwrap();
        home.notify_all().unwrap();
        assert_eq!(status(&home, 0), DeviceStatus::On);
        assert_eq!(status(&home, 1), DeviceStatus::On);
    }

    #[test]
    fn should_use_trigger_reaction_when_firing() {
        let (mut home, sensor, _) = home_with(&["fan"]);
        home.turn_off(DeviceId::new(0)).unwrap();
        home.add_trigger("temperature", "25", "turnOn").unwrap();

        sensor.set(30.0);
        home.notify_all().unwrap();
        assert_eq!(status(&home, 0), DeviceStatus::On);
    }

    #[test]
    fn should_store_unknown_trigger_kind_without_ever_firing() {
        let (mut home, sensor, _) = home_with(&["light"]);
        home.add_trigger("humidity", "60", "off").unwrap();

        sensor.set(1000.0);
        assert!(!home.update_device(DeviceId::new(0)).unwrap());
        assert_eq!(
            home.triggers()[0].kind,
            TriggerKind::Custom("humidity".to_string())
        );
        assert_eq!(status(&home, 0), DeviceStatus::On);
    }

    #[test]
    fn should_clear_bindings_when_removing_missing_trigger_kind() {
        let (mut home, _, _) = home_with(&["light", "lock"]);
        home.add_trigger("humidity", "60", "off").unwrap();

        let removed = home.remove_trigger("temperature");

        assert!(removed.is_none());
        assert_eq!(home.triggers().len(), 1);
        assert!(home.registry().iter().all(|d| d.trigger.is_none()));
        assert!(home.triggers()[0].observers().is_empty());
    }

    #[test]
    fn should_remove_only_first_trigger_of_kind() {
        let (mut home, _, _) = home_with(&["light"]);
        let first = home.add_trigger("temperature", "70", "off").unwrap();
        let second = home.add_trigger("temperature", "80", "off").unwrap();

        let removed = home.remove_trigger("temperature").unwrap();

        assert_eq!(removed.id, first);
        assert_eq!(home.triggers().len(), 1);
        assert_eq!(home.triggers()[0].id, second);
        assert!(home.device(DeviceId::new(0)).unwrap().trigger.is_none());
    }

    #[test]
    fn should_not_fire_after_trigger_removed() {
        let (mut home, sensor, _) = home_with(&["heater"]);
        home.add_trigger("temperature", "75", "off").unwrap();
        home.remove_trigger("temperature");

        sensor.set(90.0);
        assert!(!home.update_device(DeviceId::new(0)).unwrap());
        assert_eq!(status(&home, 0), DeviceStatus::On);
    }

    #[test]
    fn should_notify_duplicate_observer_twice() {
        let (mut home, sensor, _) = home_with(&["light"]);
        let id = home.add_trigger("temperature", "10", "off").unwrap();
        home.triggers
            .iter_mut()
            .find(|t| t.id == id)
            .unwrap()
            .add_observer(DeviceId::new(0));
        assert_eq!(home.triggers()[0].observers().len(), 2);

        sensor.set(20.0);
        home.notify_observers(id).unwrap();
        assert_eq!(status(&home, 0), DeviceStatus::Off);
    }

    #[test]
    fn should_drop_every_duplicate_from_previous_trigger_on_rebind() {
        let (mut home, sensor, _) = home_with(&["light"]);
        let first = home.add_trigger("temperature", "10", "off").unwrap();
        home.triggers[0].add_observer(DeviceId::new(0));
        assert_eq!(home.triggers()[0].observers().len(), 2);

        home.add_trigger("temperature", "50", "off").unwrap();

        assert!(home.triggers()[0].observers().is_empty());
        sensor.set(60.0);
        home.notify_observers(first).unwrap();
        assert_eq!(status(&home, 0), DeviceStatus::On);
    }

    /// Sensor that answers a fixed number of reads, then fails.
    struct FlakySensor {
        value: f64,
        reads_left: Cell<usize>,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("sensor went offline")]
    struct Offline;

    impl TemperatureSensor for FlakySensor {
        fn temperature(&self) -> Result<f64, HomeError> {
            match self.reads_left.get() {
                0 => Err(HomeError::Sensor(Box::new(Offline))),
                n => {
                    self.reads_left.set(n - 1);
                    Ok(self.value)
                }
            }
        }
    }

    #[test]
    fn should_stop_notifying_at_first_failing_observer() {
        let sensor = FlakySensor {
            value: 90.0,
            reads_left: Cell::new(1),
        };
        let mut home = SmartHome::new(sensor, RecordingScheduler::default());
        for kind in ["light", "fan", "lock"] {
            home.register_device(kind, DeviceStatus::On).unwrap();
        }
        let id = home.add_trigger("temperature", "75", "off").unwrap();

        let result = home.notify_observers(id);

        assert!(matches!(result, Err(HomeError::Sensor(_))));
        let statuses: Vec<_> = home.registry().iter().map(|d| d.status).collect();
        assert_eq!(
            statuses,
            vec![DeviceStatus::Off, DeviceStatus::On, DeviceStatus::On]
        );
    }

    #[test]
    fn should_report_missing_trigger_on_notify() {
        let (mut home, _, _) = home_with(&[]);
        assert!(matches!(
            home.notify_observers(TriggerId::new()),
            Err(HomeError::NotFound(_))
        ));
    }

    #[test]
    fn should_drop_removed_device_from_observers() {
        let (mut home, _, _) = home_with(&["light", "lock"]);
        home.add_trigger("temperature", "75", "off").unwrap();

        home.remove_device(DeviceId::new(0)).unwrap();

        assert_eq!(home.triggers()[0].observers(), &[DeviceId::new(1)]);
        home.notify_all().unwrap();
    }

    #[test]
    fn should_leave_devices_added_after_trigger_unbound() {
        let (mut home, _, _) = home_with(&["light"]);
        home.add_trigger("temperature", "75", "off").unwrap();
        let late = home.register_device("lock", DeviceStatus::On).unwrap();
        assert!(home.device(late).unwrap().trigger.is_none());
    }

    #[test]
    fn should_execute_turn_on_by_stable_id() {
        let (mut home, _, _) = home_with(&["light", "fan", "lock"]);
        home.turn_off(DeviceId::new(2)).unwrap();

        let outcome = home.execute("turnOn(2)").unwrap();

        assert_eq!(outcome, Outcome::Done);
        assert_eq!(status(&home, 2), DeviceStatus::On);
    }

    #[test]
    fn should_report_lookup_error_for_unknown_device() {
        let (mut home, _, _) = home_with(&["light", "fan", "lock"]);
        let result = home.execute("turnOn(5)");
        assert!(matches!(result, Err(HomeError::NotFound(e)) if e.id == "5"));
    }

    #[test]
    fn should_keep_addressing_devices_after_removal() {
        let (mut home, _, _) = home_with(&["light", "fan", "lock"]);
        home.remove_device(DeviceId::new(0)).unwrap();

        home.execute("turnOff(2)").unwrap();

        assert_eq!(status(&home, 2), DeviceStatus::Off);
        assert_eq!(status(&home, 1), DeviceStatus::On);
    }

    #[test]
    fn should_print_status_lines_in_registration_order() {
        let sensor = FixedSensor::default();
        let mut home = SmartHome::new(sensor, RecordingScheduler::default());
        home.register_device("light", DeviceStatus::On).unwrap();
        home.register_device("lock", DeviceStatus::Off).unwrap();

        let outcome = home.execute("viewStatus()").unwrap();

        assert_eq!(
            outcome,
            Outcome::Status(vec![
                "light 0 is on.".to_string(),
                "lock 1 is off.".to_string()
            ])
        );
    }

    #[test]
    fn should_reject_unknown_command_without_touching_state() {
        let (mut home, _, scheduler) = home_with(&["light"]);
        home.add_trigger("temperature", "75", "off").unwrap();
        let before: Vec<_> = home.registry().iter().cloned().collect();

        let result = home.execute("frobnicate(1)");

        assert!(matches!(result, Err(HomeError::UnknownCommand(_))));
        let after: Vec<_> = home.registry().iter().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(home.triggers().len(), 1);
        assert!(scheduler.0.borrow().is_empty());
    }

    #[test]
    fn should_hand_schedule_to_scheduler() {
        let (mut home, _, scheduler) = home_with(&["light", "lock"]);

        home.execute("schedule(1, '22:00', 'turnOff(1)')").unwrap();

        assert_eq!(
            scheduler.0.borrow().as_slice(),
            &[ScheduledJob {
                device: DeviceId::new(1),
                at: "22:00".to_string(),
                command: "turnOff(1)".to_string(),
            }]
        );
        assert_eq!(status(&home, 1), DeviceStatus::On);
    }

    #[test]
    fn should_not_schedule_for_unknown_device() {
        let (mut home, _, scheduler) = home_with(&["light"]);
        let result = home.execute("schedule(9, '22:00', 'turnOff(9)')");
        assert!(matches!(result, Err(HomeError::NotFound(_))));
        assert!(scheduler.0.borrow().is_empty());
    }

    #[test]
    fn should_fire_scheduled_job_like_direct_command() {
        let (mut home, _, scheduler) = home_with(&["light"]);
        home.execute("schedule(0, '+1s', 'turnOff(0)')").unwrap();

        let job = scheduler.0.borrow()[0].clone();
        home.fire(&job).unwrap();

        assert_eq!(status(&home, 0), DeviceStatus::Off);
    }

    #[test]
    fn should_add_and_remove_triggers_through_commands() {
        let (mut home, _, _) = home_with(&["light"]);
        home.execute("addTrigger('temperature', '75', 'turnOff')")
            .unwrap();
        assert_eq!(home.triggers()[0].reaction, Reaction::TurnOff);

        home.execute("removeTrigger('temperature')").unwrap();
        assert!(home.triggers().is_empty());
    }

    #[test]
    fn should_reject_non_numeric_threshold_through_commands() {
        let (mut home, _, _) = home_with(&["light"]);
        let result = home.execute("addTrigger('temperature', 'warm', 'off')");
        assert!(matches!(
            result,
            Err(HomeError::Parse(ParseError::InvalidThreshold(_)))
        ));
        assert!(home.triggers().is_empty());
        assert!(home.device(DeviceId::new(0)).unwrap().trigger.is_none());
    }
}
