pub fn render_reset_code(name: &str, code: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html>
<head><meta charset="utf-8"></head>
<body style="font-family: sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
    <h2>Password Reset Request</h2>
    <p>Hi {name},</p>
    <p>We received a request to reset the password for your account. Your reset code is:</p>
    <p style="font-family: monospace; font-size: 24px; letter-spacing: 4px; background: #f4f4f4; padding: 12px 20px; display: inline-block;">{code}</p>
    <p>This code expires in 15 minutes and can be used once.</p>
    <p style="color: #666; font-size: 14px;">If you didn't request a password reset, you can ignore this email.</p>
</body>
</html>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_code_email_includes_name_and_code() {
        let html = render_reset_code("Ada Lovelace", "482913");
        assert!(html.contains("Hi Ada Lovelace,"));
        assert!(html.contains("482913"));
        assert!(html.contains("expires in 15 minutes"));
    }
}
