mod mock_adapter;

use std::time::Duration;

use appliance_beacon::configurator::{self, Configurator};
use appliance_beacon::error::ErrorKind;
use appliance_beacon::{
    lifecycle, AdapterState, AdvertisementConfig, Config, HardwareAddress, ServiceDescriptor, Shutdown,
    ShutdownSignal, Step, Uuid,
};
use tokio::sync::mpsc;

use crate::mock_adapter::{Call, CallLog, FailAt, MockAdapter};

const SERVICE: Uuid = Uuid::from_u128(0x57a66fdd_d258_587b_b3d5_23c7303ad6d9);

fn known_address() -> HardwareAddress {
    "02:42:ac:11:00:02".parse().unwrap()
}

fn appliance_advertisement() -> AdvertisementConfig {
    AdvertisementConfig::new("ApplianceMonitor - d5285d75", vec![SERVICE])
}

#[tokio::test]
async fn enable_failure_stops_before_any_other_call() {
    let log = CallLog::default();
    let err = configurator::bring_up(
        MockAdapter::failing(log.clone(), FailAt::Enable),
        &ServiceDescriptor::new(SERVICE),
        &appliance_advertisement(),
    )
    .await
    .err()
    .unwrap();

    assert_eq!(err.step(), Step::Enable);
    assert_eq!(err.kind(), ErrorKind::AdapterUnavailable);
    assert_eq!(err.exit_code(), 3);
    assert_eq!(log.calls(), vec![Call::Enable]);
}

#[tokio::test]
async fn each_failure_ends_the_sequence_at_its_step() {
    let cases = [
        (FailAt::AddService, Step::RegisterService, 2),
        (FailAt::Configure, Step::ConfigureAdvertisement, 3),
        (FailAt::Start, Step::StartAdvertising, 4),
    ];
    for (fail_at, step, calls) in cases {
        let log = CallLog::default();
        let err = configurator::bring_up(
            MockAdapter::failing(log.clone(), fail_at),
            &ServiceDescriptor::new(SERVICE),
            &appliance_advertisement(),
        )
        .await
        .err()
        .unwrap();

        assert_eq!(err.step(), step, "{fail_at:?}");
        assert_eq!(log.calls().len(), calls, "{fail_at:?}");
    }
}

#[tokio::test]
async fn successful_bring_up_registers_one_empty_service_and_starts_once() {
    let log = CallLog::default();
    let result = configurator::bring_up(
        MockAdapter::new(log.clone()),
        &ServiceDescriptor::new(SERVICE),
        &appliance_advertisement(),
    )
    .await;
    assert!(result.is_ok());

    assert_eq!(
        log.count(|c| matches!(c, Call::AddService(s) if s.uuid == SERVICE && s.characteristics.is_empty())),
        1
    );
    assert_eq!(log.count(|c| matches!(c, Call::AddService(_))), 1);
    assert_eq!(log.count(|c| *c == Call::Start), 1);
    assert_eq!(log.calls().last(), Some(&Call::Start));
}

#[tokio::test]
async fn oversize_name_is_rejected_before_reaching_the_stack() {
    let log = CallLog::default();
    let advertisement = AdvertisementConfig::new("ApplianceMonitor - d5285d75-e50e-3032", vec![SERVICE]);
    let err = configurator::bring_up(MockAdapter::new(log.clone()), &ServiceDescriptor::new(SERVICE), &advertisement)
        .await
        .err()
        .unwrap();

    assert_eq!(err.step(), Step::ConfigureAdvertisement);
    assert_eq!(err.kind(), ErrorKind::PayloadTooLarge);
    assert_eq!(log.count(|c| matches!(c, Call::Configure(_) | Call::Start)), 0);
}

#[tokio::test]
async fn nil_service_is_rejected() {
    let log = CallLog::default();
    let err = configurator::bring_up(
        MockAdapter::new(log.clone()),
        &ServiceDescriptor::new(Uuid::nil()),
        &appliance_advertisement(),
    )
    .await
    .err()
    .unwrap();

    assert_eq!(err.step(), Step::RegisterService);
    assert_eq!(err.kind(), ErrorKind::InvalidParameter);
    assert_eq!(log.calls(), vec![Call::Enable]);
}

#[tokio::test]
async fn steps_must_run_in_order() {
    let log = CallLog::default();
    let mut configurator = Configurator::new(MockAdapter::new(log.clone()));
    assert_eq!(configurator.state(), AdapterState::Disabled);

    let err = configurator
        .register_service(&ServiceDescriptor::new(SERVICE))
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotReady);
    assert_eq!(configurator.state(), AdapterState::Disabled);

    configurator.enable().await.unwrap();
    assert_eq!(configurator.state(), AdapterState::Enabled);
    let err = configurator.enable().await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NotReady);

    let err = configurator.start_advertising().await.err().unwrap();
    assert_eq!(err.step(), Step::StartAdvertising);
    assert_eq!(err.kind(), ErrorKind::NotReady);
    assert_eq!(log.calls(), vec![Call::Enable]);
}

#[tokio::test]
async fn run_fails_before_the_radio_without_a_hardware_address() {
    let log = CallLog::default();
    let interfaces = [HardwareAddress::new([0u8; 6])];
    let err = lifecycle::run(
        &Config::default(),
        &interfaces[..],
        MockAdapter::new(log.clone()),
        &Shutdown::new(),
    )
    .await
    .unwrap_err();

    assert_eq!(err.step(), Step::DeriveIdentity);
    assert_eq!(err.kind(), ErrorKind::NoHardwareAddress);
    assert_eq!(err.exit_code(), 2);
    assert!(log.calls().is_empty());
}

#[tokio::test]
async fn interrupt_after_startup_stops_without_further_adapter_calls() {
    let log = CallLog::default();
    let shutdown = Shutdown::new();
    let (tx, rx) = mpsc::channel(2);
    let handler = lifecycle::spawn_signal_handler(rx, shutdown.clone());
    let config = Config::default();
    let interfaces = [HardwareAddress::new(Vec::new()), known_address()];

    let running = lifecycle::run(&config, &interfaces[..], MockAdapter::new(log.clone()), &shutdown);
    let interrupt = async {
        while log.count(|c| *c == Call::Start) == 0 {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        tx.send(ShutdownSignal::Interrupt).await.unwrap();
    };
    let (result, ()) = tokio::join!(running, interrupt);

    result.unwrap();
    assert_eq!(handler.await.unwrap(), Some(ShutdownSignal::Interrupt));
    assert!(shutdown.is_cancelled());
    assert_eq!(
        log.calls(),
        vec![
            Call::Enable,
            Call::AddService(ServiceDescriptor::new(SERVICE)),
            Call::Configure(appliance_advertisement()),
            Call::Start,
        ]
    );
}
