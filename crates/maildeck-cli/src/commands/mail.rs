//! Mailbox commands: list, read, compose, reply, delete.

use maildeck::email::{EmailDraft, Folder, MailClient};
use maildeck::timestamp;
use maildeck::{Config, Result};

pub async fn list(config: &Config, folder: Folder) -> Result<()> {
    let client = MailClient::from_config(config)?;
    let emails = client.list_emails(Some(folder)).await?;

    if emails.is_empty() {
        println!("No emails in {}", folder);
        return Ok(());
    }

    for email in &emails {
        let marker = if email.is_read { ' ' } else { '*' };
        // Inbox shows who it came from, sent shows who it went to.
        let counterpart = match folder {
            Folder::Inbox => &email.sender,
            Folder::Sent => &email.recipient,
        };
        println!(
            "{} {:<38} {:<28} {:<44} {}",
            marker,
            email.id,
            counterpart,
            email.subject,
            timestamp::format_date(&email.timestamp)
        );
    }
    Ok(())
}

pub async fn read(config: &Config, id: &str) -> Result<()> {
    let client = MailClient::from_config(config)?;

    match client.get_email(id).await {
        Ok(email) => {
            println!("From:    {}", email.sender);
            println!("To:      {}", email.recipient);
            println!("Subject: {}", email.subject);
            println!("Date:    {}", timestamp::format_date(&email.timestamp));
            if !email.attachments.is_empty() {
                println!("Attachments: {}", email.attachments.join(", "));
            }
            println!();
            println!("{}", email.body);
            Ok(())
        }
        Err(err) if err.is_not_found() => {
            println!("Email {} not found.", id);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}

pub async fn compose(
    config: &Config,
    from: &str,
    to: &str,
    subject: &str,
    body: &str,
) -> Result<()> {
    let client = MailClient::from_config(config)?;
    let draft = EmailDraft {
        sender: from.to_string(),
        recipient: to.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
    };

    let email = client.create_email(&draft).await?;
    println!("Sent email {} to {}", email.id, email.recipient);
    Ok(())
}

pub async fn reply(config: &Config, id: &str, body: &str) -> Result<()> {
    let client = MailClient::from_config(config)?;

    // The original provides the thread context: its sender becomes the
    // recipient, the backend handles the subject prefix.
    let original = match client.get_email(id).await {
        Ok(email) => email,
        Err(err) if err.is_not_found() => {
            println!("Email {} not found.", id);
            return Ok(());
        }
        Err(err) => return Err(err.into()),
    };

    let draft = EmailDraft {
        sender: original.recipient.clone(),
        recipient: original.sender.clone(),
        subject: original.subject.clone(),
        body: body.to_string(),
    };

    let reply = client.reply_to_email(id, &draft).await?;
    println!("Sent reply {} ({})", reply.id, reply.subject);
    Ok(())
}

pub async fn delete(config: &Config, id: &str) -> Result<()> {
    let client = MailClient::from_config(config)?;

    match client.delete_email(id).await {
        Ok(()) => {
            println!("Deleted email {}", id);
            Ok(())
        }
        Err(err) if err.is_not_found() => {
            println!("Email {} not found.", id);
            Ok(())
        }
        Err(err) => Err(err.into()),
    }
}
