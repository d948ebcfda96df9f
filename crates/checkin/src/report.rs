//! Plain-text rendering of the attendance view for the terminal.

use std::fmt::Write;

use asistencia_common::{Challenge, Notice, NoticeLevel, PageView, Session};
use chrono::{DateTime, Local};

/// Welcome block with the time the view was opened
pub fn header(session: &Session, opened_at: DateTime<Local>) -> String {
    let mut out = String::new();
    if !session.username.is_empty() {
        let _ = writeln!(out, "[{}]", session.username);
    }
    let _ = writeln!(out, "Bienvenido");
    let _ = writeln!(out, "{}", session.display_name());
    let _ = writeln!(
        out,
        "Fecha y hora de ingreso: {}",
        opened_at.format("%d/%m/%Y, %H:%M:%S")
    );
    out
}

/// Instructions naming the two positions to answer
pub fn challenge(challenge: &Challenge) -> String {
    format!(
        "Para registrar su asistencia ingrese los dígitos de su cédula\n\
         Posiciones solicitadas: {} y {}",
        challenge.position_a(),
        challenge.position_b()
    )
}

pub fn notice(notice: &Notice) -> String {
    let tag = match notice.level {
        NoticeLevel::Success => "OK",
        NoticeLevel::Warning => "AVISO",
        NoticeLevel::Danger => "ERROR",
    };
    format!("[{}] {}", tag, notice.message)
}

/// History table for one page
pub fn page(page: &PageView) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Historial de Asistencias ({})", page.total_records);

    if page.is_empty() {
        let _ = writeln!(out, "No hay registros de asistencia");
        return out;
    }

    let _ = writeln!(
        out,
        "{:<10} {:<10} {:<13} {:<12} {}",
        "Día", "Fecha", "Hora Registro", "Hora Entrada", "Info"
    );
    for item in &page.items {
        let _ = writeln!(
            out,
            "{:<10} {:<10} {:<13} {:<12} {}",
            item.day_name,
            item.formatted_date,
            item.adjusted_time,
            item.expected_time,
            item.verdict.label()
        );
    }

    if page.has_multiple_pages {
        let _ = writeln!(out, "{} de {}", page.page_index + 1, page.total_pages);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use asistencia_common::{DecoratedRecord, Verdict};
    use chrono::TimeZone;

    fn decorated(verdict: Verdict) -> DecoratedRecord {
        DecoratedRecord {
            day_name: "Miércoles".to_string(),
            formatted_date: "08.05.2024".to_string(),
            adjusted_time: "17:15".to_string(),
            expected_time: "17:00".to_string(),
            verdict,
        }
    }

    #[test]
    fn test_empty_history() {
        let view = PageView {
            page_index: 0,
            page_size: 5,
            total_pages: 1,
            total_records: 0,
            has_multiple_pages: false,
            items: vec![],
        };
        let text = page(&view);
        assert!(text.contains("Historial de Asistencias (0)"));
        assert!(text.contains("No hay registros de asistencia"));
    }

    #[test]
    fn test_page_rows_and_position() {
        let view = PageView {
            page_index: 1,
            page_size: 5,
            total_pages: 3,
            total_records: 12,
            has_multiple_pages: true,
            items: vec![decorated(Verdict::Late), decorated(Verdict::OnTime)],
        };
        let text = page(&view);
        assert!(text.contains("Miércoles"));
        assert!(text.contains("Atraso"));
        assert!(text.contains("En hora"));
        assert!(text.trim_end().ends_with("2 de 3"));
    }

    #[test]
    fn test_single_page_has_no_position_line() {
        let view = PageView {
            page_index: 0,
            page_size: 5,
            total_pages: 1,
            total_records: 1,
            has_multiple_pages: false,
            items: vec![decorated(Verdict::Late)],
        };
        assert!(!page(&view).contains(" de 1"));
    }

    #[test]
    fn test_header_and_challenge() {
        let session = Session {
            record_id: 15,
            identity_number: "1712345680".to_string(),
            given_names: "Ana".to_string(),
            family_names: "Pérez".to_string(),
            username: "aperez".to_string(),
        };
        let opened = Local.with_ymd_and_hms(2024, 5, 8, 7, 55, 3).unwrap();
        let text = header(&session, opened);
        assert!(text.contains("Ana Pérez"));
        assert!(text.contains("08/05/2024, 07:55:03"));
        assert!(!text.contains("1712345680"));

        let c = Challenge::from_positions(3, 7, 10).unwrap();
        assert!(challenge(&c).ends_with("3 y 7"));
    }
}
