use core::mem;

use crate::iface::Interface;
use crate::layer::Result;
use crate::nic::Device;
use crate::storage::Buffer;
use crate::wire::{ethernet_frame, EthernetAddress, EthernetProtocol, EthernetRepr};
use crate::wire::ETHERNET_MIN_PAYLOAD;

use super::{Network, HEADER_LEN};

impl<D: Device> Interface<D> {
    /// Try to receive a single frame from the device and process it.
    ///
    /// Returns `Ok(false)` if the device had no frame pending.
    pub fn ethernet_poll(&mut self) -> Result<bool> {
        let mut frame = mem::replace(&mut self.rx, Buffer::default());
        frame.reset(Self::RX_LEN);

        let received = self.nic.recv(frame.as_mut_slice());
        let result = match received {
            Ok(0) => Ok(false),
            Ok(len) => {
                let excess = frame.len().saturating_sub(len);
                if frame.remove_padding(excess).is_ok() {
                    self.ethernet_in(&mut frame);
                }
                Ok(true)
            },
            Err(err) => Err(err),
        };

        self.rx = frame;
        result
    }

    /// Process a received frame.
    ///
    /// Strips the header and hands the payload to the network protocol registered for its
    /// EtherType. Frames that are too short or of an unknown protocol are dropped.
    pub fn ethernet_in(&mut self, frame: &mut Buffer) {
        let repr = match EthernetRepr::parse(ethernet_frame::new_unchecked(frame.as_slice())) {
            Ok(repr) => repr,
            Err(err) => {
                net_debug!("eth: dropped frame of {} octets: {}", frame.len(), err);
                return;
            },
        };

        if frame.remove_header(HEADER_LEN).is_err() {
            return;
        }

        match self.eth.lookup(repr.ethertype) {
            Some(Network::Arp) => self.arp_in(frame, repr.src_addr),
            Some(Network::Ipv4) => self.ip_in(frame, repr.src_addr),
            None => net_trace!("eth: ignored frame of type {} from {}", repr.ethertype, repr.src_addr),
        }
    }

    /// Frame `payload` and hand it to the device.
    ///
    /// Pads the payload with zeroes to the ethernet minimum before prepending the header.
    pub fn ethernet_out(
        &mut self,
        mut payload: Buffer,
        dst_addr: EthernetAddress,
        protocol: EthernetProtocol,
    ) -> Result<()> {
        if payload.len() < ETHERNET_MIN_PAYLOAD {
            payload.add_padding(ETHERNET_MIN_PAYLOAD - payload.len())?;
        }
        payload.add_header(HEADER_LEN)?;

        let repr = EthernetRepr {
            src_addr: self.config.hardware_addr,
            dst_addr,
            ethertype: protocol,
        };
        repr.emit(ethernet_frame::new_unchecked_mut(payload.as_mut_slice()));

        net_trace!("eth: sending {} octets of {} to {}", payload.len(), protocol, dst_addr);
        self.nic.send(payload.as_slice())
    }
}
