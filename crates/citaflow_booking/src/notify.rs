// --- File: crates/citaflow_booking/src/notify.rs ---
//! Confirmation e-mail rendering. Pure: templating only, sending belongs to
//! the mailer implementation.

use citaflow_common::services::EmailMessage;
use citaflow_config::ServiceDefinition;

use crate::coordinator::BookingRequest;

/// Renders the client confirmation for a completed booking. `start_local`
/// is the wall-clock slot start already formatted in the practice's zone.
pub fn render_confirmation(
    request: &BookingRequest,
    service: &ServiceDefinition,
    start_local: &str,
    event_link: Option<&str>,
) -> EmailMessage {
    let link_item = match event_link {
        Some(link) => format!(
            "  <li>Enlace al evento: <a href=\"{link}\">Ver en Google Calendar</a></li>\n"
        ),
        None => String::new(),
    };

    let html_body = format!(
        "<p>Hola {nombre},</p>\n\
         <p>Tu cita de <b>{tipo}</b> ha sido confirmada:</p>\n\
         <ul>\n\
         \x20 <li>Fecha y Hora: <b>{start_local}</b></li>\n\
         {link_item}\
         </ul>\n\
         <p>Recibirás un recordatorio por email antes de la cita. ¡Gracias!</p>\n",
        nombre = request.nombre,
        tipo = service.name,
    );

    EmailMessage {
        to: request.email.clone(),
        subject: "Confirmación de Cita".to_string(),
        html_body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use citaflow_config::BookingConfig;

    fn request() -> BookingRequest {
        BookingRequest {
            date: "2024-03-15 09:00".to_string(),
            service_type: "consulta".to_string(),
            nombre: "Ana".to_string(),
            apellido: "García".to_string(),
            email: "ana@example.com".to_string(),
            telefono: "600000000".to_string(),
        }
    }

    #[test]
    fn confirmation_carries_name_service_and_slot() {
        let services = BookingConfig::default().services;
        let mail = render_confirmation(
            &request(),
            &services[0],
            "15/3/2024, 09:00",
            Some("https://calendar.google.com/event?eid=abc"),
        );

        assert_eq!(mail.to, "ana@example.com");
        assert!(mail.html_body.contains("Hola Ana"));
        assert!(mail.html_body.contains(&services[0].name));
        assert!(mail.html_body.contains("15/3/2024, 09:00"));
        assert!(mail
            .html_body
            .contains("https://calendar.google.com/event?eid=abc"));
    }

    #[test]
    fn missing_event_link_omits_the_link_item() {
        let services = BookingConfig::default().services;
        let mail = render_confirmation(&request(), &services[0], "15/3/2024, 09:00", None);
        assert!(!mail.html_body.contains("Enlace al evento"));
    }
}
