//! BLE host task for the UART bridge
//!
//! Manages advertising and connections, feeds GATT writes into the
//! inbound capture, and drains the outbound queue into notifications.

use core::sync::atomic::Ordering;

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use trouble_host::prelude::*;

use crate::ble::service::UartService;
use crate::config::ble::{DEVICE_NAME_PREFIX, UART_PAYLOAD_MAX};
use crate::uart::transport::{self, LINK_CONNECTED, OUTBOUND_QUEUE, UART_TX_HANDLE};

/// Number of maximum concurrent connections
const CONNECTIONS_MAX: usize = 1;
/// Number of L2CAP channels
const L2CAP_CHANNELS_MAX: usize = 3;

/// BLE GATT server carrying the UART service
#[gatt_server(mutex_type = CriticalSectionRawMutex)]
struct Server {
    uart: UartService,
}

/// Format device ID bytes as uppercase hex into a buffer
/// Returns the formatted string slice
fn format_device_name<'a>(buf: &'a mut [u8; 20], device_id: &[u8; 3]) -> &'a str {
    const HEX_CHARS: &[u8; 16] = b"0123456789ABCDEF";
    let prefix = DEVICE_NAME_PREFIX.as_bytes();

    buf[..prefix.len()].copy_from_slice(prefix);

    let mut pos = prefix.len();
    for &byte in device_id {
        buf[pos] = HEX_CHARS[(byte >> 4) as usize];
        buf[pos + 1] = HEX_CHARS[(byte & 0x0F) as usize];
        pos += 2;
    }

    // All bytes are ASCII, so this will always succeed
    core::str::from_utf8(&buf[..pos]).unwrap_or(DEVICE_NAME_PREFIX)
}

/// Main BLE task that manages the Bluetooth stack and connections
///
/// This task:
/// 1. Initialises the BLE controller
/// 2. Starts advertising as "BlueArt-XXXXXX" (unique per device)
/// 3. Publishes the attribute handles to the bridge
/// 4. Routes writes to the RX characteristic into the inbound capture
/// 5. Drains the outbound queue into TX notifications
pub async fn ble_task<C: Controller>(controller: C, device_id: [u8; 3]) {
    let mut device_name_buf = [0u8; 20];
    let device_name = format_device_name(&mut device_name_buf, &device_id);

    log::info!("BLE: starting as '{}'", device_name);

    let mut resources: HostResources<DefaultPacketPool, CONNECTIONS_MAX, L2CAP_CHANNELS_MAX> =
        HostResources::new();

    // Build the BLE stack with address derived from device ID
    let stack = trouble_host::new(controller, &mut resources).set_random_address(
        Address::random([device_id[0], device_id[1], device_id[2], 0x1E, 0x83, 0xE7]),
    );

    let Host {
        mut peripheral,
        mut runner,
        ..
    } = stack.build();

    let gap = GapConfig::Peripheral(PeripheralConfig {
        name: device_name,
        appearance: &appearance::UNKNOWN,
    });
    let server: Server = match Server::new_with_config(gap) {
        Ok(s) => s,
        Err(_) => return,
    };

    // Hand the attribute handles to the bridge: the capture filters on the
    // RX handle, the coalescer notifies on the TX handle
    transport::register_inbound_handle(server.uart.rx.handle);
    UART_TX_HANDLE.signal(server.uart.tx.handle);

    let runner_task = runner.run();

    let peripheral_task = async {
        let mut adv_data = [0u8; 31];
        let len = match AdStructure::encode_slice(
            &[
                AdStructure::Flags(LE_GENERAL_DISCOVERABLE | BR_EDR_NOT_SUPPORTED),
                AdStructure::CompleteLocalName(device_name.as_bytes()),
            ],
            &mut adv_data,
        ) {
            Ok(l) => l,
            Err(_) => return,
        };

        loop {
            log::info!("BLE: advertising...");
            let advertiser = match peripheral
                .advertise(
                    &Default::default(),
                    Advertisement::ConnectableScannableUndirected {
                        adv_data: &adv_data[..len],
                        scan_data: &[],
                    },
                )
                .await
            {
                Ok(a) => a,
                Err(_) => continue,
            };

            let acceptor = match advertiser.accept().await {
                Ok(a) => {
                    log::info!("BLE: connected");
                    a
                }
                Err(_) => continue,
            };

            let conn = match acceptor.with_attribute_server(&*server) {
                Ok(c) => c,
                Err(_) => continue,
            };

            LINK_CONNECTED.store(true, Ordering::Relaxed);

            loop {
                // Handle GATT events and queued outbound payloads together
                let gatt_future = conn.next();
                let outbound_future = OUTBOUND_QUEUE.receive();

                match embassy_futures::select::select(gatt_future, outbound_future).await {
                    embassy_futures::select::Either::First(gatt_event) => match gatt_event {
                        GattConnectionEvent::Disconnected { reason: _ } => {
                            log::info!("BLE: disconnected");
                            LINK_CONNECTED.store(false, Ordering::Relaxed);
                            // Stale payloads must not leak to the next peer
                            transport::drain_outbound_queue();
                            break;
                        }
                        GattConnectionEvent::Gatt { event } => match event {
                            GattEvent::Write(write_event) => {
                                // The capture filters on handle itself; writes to
                                // other characteristics pass through untouched
                                transport::capture_fragment(
                                    write_event.handle(),
                                    write_event.data(),
                                );
                                let _ = write_event.accept();
                            }
                            GattEvent::Read(read_event) => {
                                let _ = read_event.accept();
                            }
                            GattEvent::Other(other_event) => {
                                let _ = other_event.accept();
                            }
                        },
                        _ => {}
                    },
                    embassy_futures::select::Either::Second(payload) => {
                        let mut value = [0u8; UART_PAYLOAD_MAX];
                        value[..payload.len()].copy_from_slice(&payload);
                        let _ = server.uart.tx.notify(&conn, &value).await;
                    }
                }
            }
        }
    };

    embassy_futures::select::select(runner_task, peripheral_task).await;
}
